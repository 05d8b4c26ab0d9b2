//! Trait definitions for table format implementations.

use std::path::{Path, PathBuf};

use crate::format::error::FormatError;
use crate::model::AnnotationTable;

/// Trait for annotation table persistence.
///
/// Each format (CSV, NumPy archive, HDF5) stores the key columns and the
/// `annotated_class` column of a table and reads them back.
pub trait TableFormat: Send + Sync {
    /// Unique identifier for this format (e.g., "csv", "npz", "hdf").
    fn id(&self) -> &'static str;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str;

    /// File extensions this format uses, lowercase without the dot.
    fn extensions(&self) -> &[&'static str];

    /// Write the whole table to `path`, replacing any existing file.
    fn save(&self, table: &AnnotationTable, path: &Path) -> Result<SaveResult, FormatError>;

    /// Read a table from `path`.
    ///
    /// The returned table carries the key columns found in the file. Matching
    /// them against the configured levels is the caller's job.
    fn load(&self, path: &Path) -> Result<AnnotationTable, FormatError>;
}

/// Result of a save operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResult {
    /// File written
    pub path: PathBuf,
    /// Number of rows written
    pub rows_written: usize,
    /// Number of rows carrying a class
    pub annotated_rows: usize,
}

impl SaveResult {
    /// Summarize a save of `table` to `path`.
    pub fn new(table: &AnnotationTable, path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            rows_written: table.len(),
            annotated_rows: table.annotated_count(),
        }
    }
}
