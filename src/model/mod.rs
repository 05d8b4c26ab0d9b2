//! Data models for the classifier.

mod class;
mod table;

pub use class::{AnnotationClass, ClassError, ClassRegistry};
pub use table::{
    AnnotationRow, AnnotationTable, LevelMismatch, ResolvedLevels, TableError, generic_levels,
    resolve_levels,
};
