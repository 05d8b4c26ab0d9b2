//! In-memory viewer over an image stack.
//!
//! Holds the displayed layer shapes and the current position. Used by the
//! terminal host and by tests in place of a GUI viewer.

use crate::data::ImageStack;
use crate::keybindings::KeyCode;
use crate::viewer::{DockArea, StepRequest, Viewer};

/// Viewer state for zero or more open stacks.
#[derive(Debug, Clone, Default)]
pub struct StackViewer {
    layers: Vec<ImageStack>,
    position: Vec<usize>,
    bound_keys: Vec<KeyCode>,
    docked: Vec<(String, DockArea)>,
}

impl StackViewer {
    /// Create a viewer with no layers open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewer showing one layer of the given shape.
    pub fn with_shape(shape: Vec<usize>) -> Self {
        let mut viewer = Self::new();
        viewer.add_layer(ImageStack::new("layer", shape, "f32"));
        viewer
    }

    /// Open a stack as a new layer. The position is reset to the origin.
    pub fn add_layer(&mut self, stack: ImageStack) {
        log::info!("Viewer: added layer {} {:?}", stack.name, stack.shape);
        self.position = vec![0; stack.shape.len()];
        self.layers.push(stack);
    }

    /// Open layers.
    pub fn layers(&self) -> &[ImageStack] {
        &self.layers
    }

    /// Full position, one index per axis.
    pub fn position(&self) -> &[usize] {
        &self.position
    }

    /// Overwrite the leading part of the position, clamped to the shape.
    pub fn set_position(&mut self, coord: &[usize]) {
        for (axis, &value) in coord.iter().enumerate() {
            self.step(axis, StepRequest::Set(value));
        }
    }

    /// Keys registered through [`Viewer::bind_key`].
    pub fn bound_keys(&self) -> &[KeyCode] {
        &self.bound_keys
    }

    /// Panels docked through [`Viewer::dock_widget`].
    pub fn docked(&self) -> &[(String, DockArea)] {
        &self.docked
    }

    fn axis_len(&self, axis: usize) -> usize {
        self.layers
            .last()
            .and_then(|layer| layer.shape.get(axis).copied())
            .unwrap_or(0)
    }
}

impl Viewer for StackViewer {
    fn layer_shapes(&self) -> Vec<Vec<usize>> {
        self.layers.iter().map(|layer| layer.shape.clone()).collect()
    }

    fn current_step(&self) -> Vec<usize> {
        self.position.clone()
    }

    fn step(&mut self, axis: usize, request: StepRequest) {
        let len = self.axis_len(axis);
        let Some(current) = self.position.get_mut(axis) else {
            log::warn!("Viewer: step on missing axis {}", axis);
            return;
        };

        let target = match request {
            StepRequest::Increment => *current + 1,
            StepRequest::Set(value) => value,
        };
        *current = target.min(len.saturating_sub(1));
    }

    fn bind_key(&mut self, key: KeyCode) {
        if !self.bound_keys.contains(&key) {
            self.bound_keys.push(key);
        }
    }

    fn dock_widget(&mut self, name: &str, area: DockArea) {
        log::debug!("Viewer: docked '{}' at {}", name, area.name());
        self.docked.push((name.to_string(), area));
    }
}
