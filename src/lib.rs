//! Stack Classifier
//!
//! Step through the leading (non-spatial) dimensions of an image stack, for
//! example cell × frame, and assign a class to every coordinate. Labels are
//! kept in a coordinate-indexed annotation table that can be saved as CSV,
//! NumPy archive or HDF5.
//!
//! The image viewer is a host capability expressed by the [`viewer::Viewer`]
//! trait. [`data::StackViewer`] implements it over a NumPy stack for the
//! terminal host and for tests.

pub mod config;
pub mod constants;
pub mod data;
pub mod format;
mod handlers;
pub mod keybindings;
pub mod message;
pub mod model;
pub mod notice;
pub mod session;
pub mod viewer;
pub mod walker;

pub use config::ClassifierConfig;
pub use message::ClassifierMessage;
pub use session::{ClassifierSession, SessionError};
pub use viewer::Viewer;
