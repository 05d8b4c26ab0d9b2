//! Image stack loading and the in-memory stack viewer.
//!
//! This module provides:
//! - `ImageStack`: shape and dtype of an opened stack
//! - `NpyStackLoader`: reads NumPy `.npy` stacks
//! - `StackViewer`: a [`Viewer`](crate::viewer::Viewer) implementation holding
//!   layer shapes and the current position

mod loader;
mod npy_loader;
mod stack;
mod stack_viewer;

pub use loader::LoaderError;
pub use npy_loader::NpyStackLoader;
pub use stack::{ImageStack, leading_shape};
pub use stack_viewer::StackViewer;
