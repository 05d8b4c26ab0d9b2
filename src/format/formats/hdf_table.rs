//! HDF5 table format.
//!
//! The table lives in a single group named `annotations`. Saving truncates
//! the file, so each file holds exactly one table.
//!
//! - `levels`: variable-length UTF-8 level names
//! - `coords`: flattened `i64` keys, `levels.len()` values per row
//! - `annotated_class`: variable-length UTF-8 class per row, empty when unset

use std::path::Path;
use std::str::FromStr;

use hdf5::types::VarLenUnicode;

use crate::constants::CLASS_COLUMN;
use crate::format::error::FormatError;
use crate::format::traits::{SaveResult, TableFormat};
use crate::model::{AnnotationRow, AnnotationTable};

/// Name of the group holding the table.
pub const HDF_NODE: &str = "annotations";

/// HDF5 single-table format.
pub struct HdfFormat;

fn to_varlen(value: &str) -> Result<VarLenUnicode, FormatError> {
    VarLenUnicode::from_str(value)
        .map_err(|e| FormatError::invalid_format(format!("cannot store '{}': {}", value, e)))
}

impl TableFormat for HdfFormat {
    fn id(&self) -> &'static str {
        "hdf"
    }

    fn display_name(&self) -> &'static str {
        "HDF5 Table"
    }

    fn extensions(&self) -> &[&'static str] {
        &["hdf", "h5"]
    }

    fn save(&self, table: &AnnotationTable, path: &Path) -> Result<SaveResult, FormatError> {
        log::info!("Writing HDF5 table to {:?}", path);

        let levels = table
            .levels()
            .iter()
            .map(|l| to_varlen(l))
            .collect::<Result<Vec<_>, _>>()?;
        let coords: Vec<i64> = table
            .rows()
            .iter()
            .flat_map(|row| row.coords.iter().map(|&c| c as i64))
            .collect();
        let classes = table
            .rows()
            .iter()
            .map(|row| to_varlen(row.annotated_class.as_deref().unwrap_or("")))
            .collect::<Result<Vec<_>, _>>()?;

        let file = hdf5::File::create(path)?;
        let group = file.create_group(HDF_NODE)?;
        group
            .new_dataset_builder()
            .with_data(levels.as_slice())
            .create("levels")?;
        group
            .new_dataset_builder()
            .with_data(coords.as_slice())
            .create("coords")?;
        group
            .new_dataset_builder()
            .with_data(classes.as_slice())
            .create(CLASS_COLUMN)?;

        Ok(SaveResult::new(table, path))
    }

    fn load(&self, path: &Path) -> Result<AnnotationTable, FormatError> {
        log::info!("Reading HDF5 table from {:?}", path);

        let file = hdf5::File::open(path)?;
        let group = file.group(HDF_NODE)?;

        let levels: Vec<String> = group
            .dataset("levels")?
            .read_raw::<VarLenUnicode>()?
            .iter()
            .map(|l| l.as_str().to_string())
            .collect();
        if levels.is_empty() {
            return Err(FormatError::invalid_format("table has no key columns"));
        }

        let coords = group.dataset("coords")?.read_raw::<i64>()?;
        if coords.len() % levels.len() != 0 {
            return Err(FormatError::invalid_format(format!(
                "{} key values do not divide into {} levels",
                coords.len(),
                levels.len()
            )));
        }
        let row_count = coords.len() / levels.len();

        let classes: Vec<Option<String>> = match group.dataset(CLASS_COLUMN) {
            Ok(dataset) => dataset
                .read_raw::<VarLenUnicode>()?
                .iter()
                .map(|c| Some(c.as_str().to_string()).filter(|c| !c.is_empty()))
                .collect(),
            Err(_) => {
                log::info!("No {} dataset in {:?}, starting unannotated", CLASS_COLUMN, path);
                vec![None; row_count]
            }
        };
        if classes.len() != row_count {
            return Err(FormatError::invalid_format(format!(
                "{} has {} entries for {} rows",
                CLASS_COLUMN,
                classes.len(),
                row_count
            )));
        }

        let rows = coords
            .chunks(levels.len())
            .zip(classes)
            .map(|(key, annotated_class)| {
                let coords = key
                    .iter()
                    .map(|&c| {
                        usize::try_from(c).map_err(|_| {
                            FormatError::invalid_format(format!("negative index {}", c))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(AnnotationRow {
                    coords,
                    annotated_class,
                })
            })
            .collect::<Result<Vec<_>, FormatError>>()?;

        Ok(AnnotationTable::from_rows(levels, rows)?)
    }
}
