//! CSV table format.
//!
//! One header row holding the level names followed by `annotated_class`,
//! then one record per row. An empty class field means "not annotated".

use std::path::Path;

use crate::constants::CLASS_COLUMN;
use crate::format::error::FormatError;
use crate::format::traits::{SaveResult, TableFormat};
use crate::model::{AnnotationRow, AnnotationTable};

/// Delimited text format.
pub struct CsvFormat;

impl TableFormat for CsvFormat {
    fn id(&self) -> &'static str {
        "csv"
    }

    fn display_name(&self) -> &'static str {
        "CSV Table"
    }

    fn extensions(&self) -> &[&'static str] {
        &["csv"]
    }

    fn save(&self, table: &AnnotationTable, path: &Path) -> Result<SaveResult, FormatError> {
        log::info!("Writing CSV table to {:?}", path);

        let mut writer = csv::Writer::from_path(path)?;

        let mut header: Vec<&str> = table.levels().iter().map(String::as_str).collect();
        header.push(CLASS_COLUMN);
        writer.write_record(&header)?;

        for row in table.rows() {
            let mut record: Vec<String> = row.coords.iter().map(|c| c.to_string()).collect();
            record.push(row.annotated_class.clone().unwrap_or_default());
            writer.write_record(&record)?;
        }
        writer.flush()?;

        Ok(SaveResult::new(table, path))
    }

    fn load(&self, path: &Path) -> Result<AnnotationTable, FormatError> {
        log::info!("Reading CSV table from {:?}", path);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;
        let headers = reader.headers()?.clone();

        let class_col = headers.iter().position(|h| h == CLASS_COLUMN);
        if class_col.is_none() {
            log::info!("No {} column in {:?}, starting unannotated", CLASS_COLUMN, path);
        }

        // unnamed columns are positional indices written by other tools
        let key_cols: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, name)| Some(*i) != class_col && !name.trim().is_empty())
            .map(|(i, name)| (i, name.to_string()))
            .collect();
        if key_cols.is_empty() {
            return Err(FormatError::invalid_format("CSV has no key columns"));
        }

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;

            let coords = key_cols
                .iter()
                .map(|(i, name)| {
                    let field = record.get(*i).unwrap_or("").trim();
                    field.parse::<usize>().map_err(|_| {
                        FormatError::invalid_format(format!(
                            "row {}: column '{}' has non-index value '{}'",
                            line + 1,
                            name,
                            field
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let annotated_class = class_col
                .and_then(|i| record.get(i))
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            rows.push(AnnotationRow {
                coords,
                annotated_class,
            });
        }

        let levels = key_cols.into_iter().map(|(_, name)| name).collect();
        Ok(AnnotationTable::from_rows(levels, rows)?)
    }
}
