//! Format registry for extension-based dispatch.

use std::path::Path;

use crate::format::formats::{CsvFormat, NpzFormat};
use crate::format::traits::TableFormat;

/// Registry of available table formats.
///
/// All built-in formats are registered automatically on creation.
pub struct FormatRegistry {
    formats: Vec<Box<dyn TableFormat>>,
}

impl FormatRegistry {
    /// Create a new registry with all built-in formats registered.
    pub fn new() -> Self {
        let mut registry = Self {
            formats: Vec::new(),
        };

        registry.register(Box::new(CsvFormat));
        registry.register(Box::new(NpzFormat));
        #[cfg(feature = "hdf5")]
        registry.register(Box::new(crate::format::formats::HdfFormat));

        registry
    }

    /// Register a format implementation.
    pub fn register(&mut self, format: Box<dyn TableFormat>) {
        self.formats.push(format);
    }

    /// Get a format by its ID.
    pub fn get(&self, id: &str) -> Option<&dyn TableFormat> {
        self.formats
            .iter()
            .find(|f| f.id() == id)
            .map(|f| f.as_ref())
    }

    /// Find the format for a file extension (case-insensitive, no dot).
    pub fn by_extension(&self, ext: &str) -> Option<&dyn TableFormat> {
        let ext = ext.to_lowercase();
        self.formats
            .iter()
            .find(|f| f.extensions().contains(&ext.as_str()))
            .map(|f| f.as_ref())
    }

    /// Find the format for a path by its extension.
    pub fn for_path(&self, path: &Path) -> Option<&dyn TableFormat> {
        let ext = path.extension()?.to_str()?;
        self.by_extension(ext)
    }

    /// All supported extensions, for file dialog filters.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        self.formats
            .iter()
            .flat_map(|f| f.extensions().iter().copied())
            .collect()
    }

    /// Registered formats, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn TableFormat> {
        self.formats.iter().map(|f| f.as_ref())
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
