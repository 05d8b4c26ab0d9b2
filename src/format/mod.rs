//! Annotation table persistence.
//!
//! Formats implement the `TableFormat` trait and are selected by file
//! extension through the `FormatRegistry`.
//!
//! ## Supported Formats
//!
//! - **CSV**: header row of level names plus `annotated_class`
//! - **NPZ**: NumPy archive holding the table as binary columns
//! - **HDF5**: one `annotations` group per file (cargo feature `hdf5`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stack_classifier::format::FormatRegistry;
//!
//! let registry = FormatRegistry::new();
//! if let Some(format) = registry.for_path(path) {
//!     format.save(&table, path)?;
//! }
//! ```

mod error;
pub mod formats;
mod registry;
mod traits;

pub use error::FormatError;
pub use registry::FormatRegistry;
pub use traits::{SaveResult, TableFormat};
