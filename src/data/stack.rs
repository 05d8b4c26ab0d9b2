//! Image stack description.

use crate::constants::SPATIAL_DIMS;

/// Shape and element type of a loaded image stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStack {
    /// Display name (usually the file name)
    pub name: String,
    /// Full array shape, spatial axes last
    pub shape: Vec<usize>,
    /// NumPy dtype name of the elements
    pub dtype: &'static str,
}

impl ImageStack {
    /// Create a new stack description.
    pub fn new(name: impl Into<String>, shape: Vec<usize>, dtype: &'static str) -> Self {
        Self {
            name: name.into(),
            shape,
            dtype,
        }
    }

    /// Shape of the leading (non-spatial) axes.
    pub fn leading_shape(&self) -> &[usize] {
        leading_shape(&self.shape)
    }
}

/// All axes except the trailing image plane.
pub fn leading_shape(shape: &[usize]) -> &[usize] {
    &shape[..shape.len().saturating_sub(SPATIAL_DIMS)]
}
