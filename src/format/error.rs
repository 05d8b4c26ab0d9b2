//! Error types for annotation table formats.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::TableError;

/// Errors that can occur while reading or writing a table file.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading a NumPy archive
    #[error("NPZ read error: {0}")]
    NpzRead(#[from] ndarray_npy::ReadNpzError),

    /// Error writing a NumPy archive
    #[error("NPZ write error: {0}")]
    NpzWrite(#[from] ndarray_npy::WriteNpzError),

    /// HDF5 library error
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// Loaded rows do not form a valid table
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Invalid format structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// Required column or array is missing
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// No format is registered for the file extension
    #[error("Unsupported file extension for {path:?}")]
    UnsupportedExtension {
        /// The path that was rejected
        path: PathBuf,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
