//! Unit tests for table format implementations.
//!
//! These tests verify file layout, error handling on malformed input and
//! save/load round trips.


use crate::model::AnnotationTable;

/// A 2 × 3 cell/frame table with a few labelled rows.
pub(super) fn create_labelled_table() -> AnnotationTable {
    let levels = vec!["cell".to_string(), "frame".to_string()];
    let mut table = AnnotationTable::build(levels, &[2, 3]);
    table.set_class(&[0, 0], "alive").unwrap();
    table.set_class(&[0, 2], "dead").unwrap();
    table.set_class(&[1, 1], "alive").unwrap();
    table
}
