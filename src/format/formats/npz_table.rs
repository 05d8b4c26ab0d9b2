//! NumPy archive table format.
//!
//! The table is stored as a `.npz` archive of binary columns:
//!
//! - `coords`: `i64` array of shape `(rows, levels)`
//! - `annotated_class`: `i64` class codes per row, `-1` for "not annotated"
//! - `levels` / `classes`: UTF-8 bytes of the level and class names, with the
//!   byte length of each name in `levels_len` / `classes_len`

use std::fs::File;
use std::path::Path;

use ndarray::{Array1, Array2};
use ndarray_npy::{NpzReader, NpzWriter};

use crate::constants::CLASS_COLUMN;
use crate::format::error::FormatError;
use crate::format::traits::{SaveResult, TableFormat};
use crate::model::{AnnotationRow, AnnotationTable};

const COORDS: &str = "coords";
const LEVELS: &str = "levels";
const LEVELS_LEN: &str = "levels_len";
const CLASSES: &str = "classes";
const CLASSES_LEN: &str = "classes_len";
const NULL_CODE: i64 = -1;

/// Binary columnar format backed by NumPy arrays.
pub struct NpzFormat;

impl TableFormat for NpzFormat {
    fn id(&self) -> &'static str {
        "npz"
    }

    fn display_name(&self) -> &'static str {
        "NumPy Archive (.npz)"
    }

    fn extensions(&self) -> &[&'static str] {
        &["npz"]
    }

    fn save(&self, table: &AnnotationTable, path: &Path) -> Result<SaveResult, FormatError> {
        log::info!("Writing NPZ table to {:?}", path);

        let rows = table.len();
        let width = table.levels().len();

        let flat: Vec<i64> = table
            .rows()
            .iter()
            .flat_map(|row| row.coords.iter().map(|&c| c as i64))
            .collect();
        let coords = Array2::from_shape_vec((rows, width), flat)
            .map_err(|e| FormatError::invalid_format(e.to_string()))?;

        let mut classes: Vec<String> = Vec::new();
        let codes: Array1<i64> = table
            .rows()
            .iter()
            .map(|row| match &row.annotated_class {
                Some(name) => match classes.iter().position(|c| c == name) {
                    Some(code) => code as i64,
                    None => {
                        classes.push(name.clone());
                        (classes.len() - 1) as i64
                    }
                },
                None => NULL_CODE,
            })
            .collect();

        let (level_bytes, level_lens) = pack_strings(table.levels());
        let (class_bytes, class_lens) = pack_strings(&classes);

        let mut npz = NpzWriter::new(File::create(path)?);
        npz.add_array(COORDS, &coords)?;
        npz.add_array(CLASS_COLUMN, &codes)?;
        npz.add_array(LEVELS, &level_bytes)?;
        npz.add_array(LEVELS_LEN, &level_lens)?;
        npz.add_array(CLASSES, &class_bytes)?;
        npz.add_array(CLASSES_LEN, &class_lens)?;
        npz.finish()?;

        Ok(SaveResult::new(table, path))
    }

    fn load(&self, path: &Path) -> Result<AnnotationTable, FormatError> {
        log::info!("Reading NPZ table from {:?}", path);

        let mut npz = NpzReader::new(File::open(path)?)?;
        let names = npz.names()?;
        let entry = |name: &str| -> Result<String, FormatError> {
            let with_ext = format!("{}.npy", name);
            names
                .iter()
                .find(|n| n.as_str() == name || **n == with_ext)
                .cloned()
                .ok_or_else(|| FormatError::missing_field(name))
        };

        let level_bytes: Array1<u8> = npz.by_name(&entry(LEVELS)?)?;
        let level_lens: Array1<i64> = npz.by_name(&entry(LEVELS_LEN)?)?;
        let levels = unpack_strings(&level_bytes, &level_lens)?;

        let coords: Array2<i64> = npz.by_name(&entry(COORDS)?)?;
        if coords.ncols() != levels.len() {
            return Err(FormatError::invalid_format(format!(
                "coords has {} columns for {} levels",
                coords.ncols(),
                levels.len()
            )));
        }

        // the class column is optional: older archives may only hold keys
        let (codes, classes) = match entry(CLASS_COLUMN) {
            Ok(name) => {
                let codes: Array1<i64> = npz.by_name(&name)?;
                let class_bytes: Array1<u8> = npz.by_name(&entry(CLASSES)?)?;
                let class_lens: Array1<i64> = npz.by_name(&entry(CLASSES_LEN)?)?;
                (Some(codes), unpack_strings(&class_bytes, &class_lens)?)
            }
            Err(_) => {
                log::info!("No {} array in {:?}, starting unannotated", CLASS_COLUMN, path);
                (None, Vec::new())
            }
        };

        if let Some(codes) = &codes {
            if codes.len() != coords.nrows() {
                return Err(FormatError::invalid_format(format!(
                    "{} has {} entries for {} rows",
                    CLASS_COLUMN,
                    codes.len(),
                    coords.nrows()
                )));
            }
        }

        let mut rows = Vec::with_capacity(coords.nrows());
        for (i, key) in coords.rows().into_iter().enumerate() {
            let coords = key
                .iter()
                .map(|&c| {
                    usize::try_from(c).map_err(|_| {
                        FormatError::invalid_format(format!("row {}: negative index {}", i, c))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let annotated_class = match codes.as_ref().map(|codes| codes[i]) {
                None | Some(NULL_CODE) => None,
                Some(code) => Some(
                    usize::try_from(code)
                        .ok()
                        .and_then(|code| classes.get(code))
                        .cloned()
                        .ok_or_else(|| {
                            FormatError::invalid_format(format!(
                                "row {}: unknown class code {}",
                                i, code
                            ))
                        })?,
                ),
            };

            rows.push(AnnotationRow {
                coords,
                annotated_class,
            });
        }

        Ok(AnnotationTable::from_rows(levels, rows)?)
    }
}

/// Concatenate UTF-8 names and record their byte lengths.
fn pack_strings(names: &[String]) -> (Array1<u8>, Array1<i64>) {
    let bytes = names.iter().flat_map(|n| n.bytes()).collect();
    let lens = names.iter().map(|n| n.len() as i64).collect();
    (bytes, lens)
}

/// Split concatenated UTF-8 names by their byte lengths.
fn unpack_strings(bytes: &Array1<u8>, lens: &Array1<i64>) -> Result<Vec<String>, FormatError> {
    let bytes: Vec<u8> = bytes.iter().copied().collect();
    let mut names = Vec::with_capacity(lens.len());
    let mut offset = 0usize;

    for &len in lens {
        let len = usize::try_from(len)
            .map_err(|_| FormatError::invalid_format(format!("negative name length {}", len)))?;
        let end = offset + len;
        let slice = bytes
            .get(offset..end)
            .ok_or_else(|| FormatError::invalid_format("name lengths exceed byte buffer"))?;
        let name = std::str::from_utf8(slice)
            .map_err(|e| FormatError::invalid_format(format!("name is not UTF-8: {}", e)))?;
        names.push(name.to_string());
        offset = end;
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack_strings() {
        let names = vec!["cell".to_string(), "".to_string(), "zeit-ä".to_string()];
        let (bytes, lens) = pack_strings(&names);
        assert_eq!(unpack_strings(&bytes, &lens).unwrap(), names);
    }

    #[test]
    fn test_unpack_rejects_overrun() {
        let bytes = Array1::from(vec![b'a', b'b']);
        let lens = Array1::from(vec![3i64]);
        assert!(unpack_strings(&bytes, &lens).is_err());
    }
}
