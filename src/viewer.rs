//! Host viewer capability.
//!
//! The classifier never owns the viewer. The host passes it into every
//! session call so the widget can read the displayed layer shape and position,
//! step the position, register key bindings and dock its panel.

use serde::{Deserialize, Serialize};

use crate::keybindings::KeyCode;

/// How the viewer should change the position along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRequest {
    /// Move one index forward
    Increment,
    /// Jump to an absolute index
    Set(usize),
}

/// Screen region a panel is docked into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockArea {
    Left,
    Right,
    Top,
    #[default]
    Bottom,
}

impl DockArea {
    /// Get the display name for this area.
    pub fn name(&self) -> &'static str {
        match self {
            DockArea::Left => "left",
            DockArea::Right => "right",
            DockArea::Top => "top",
            DockArea::Bottom => "bottom",
        }
    }
}

/// Operations the classifier needs from an image viewer.
pub trait Viewer {
    /// Shapes of the open image layers.
    fn layer_shapes(&self) -> Vec<Vec<usize>>;

    /// Current position, one index per axis of the displayed layer.
    fn current_step(&self) -> Vec<usize>;

    /// Change the position along `axis`.
    fn step(&mut self, axis: usize, request: StepRequest);

    /// Forward presses of `key` to the classifier as
    /// [`ClassifierMessage::KeyPressed`](crate::message::ClassifierMessage::KeyPressed).
    fn bind_key(&mut self, key: KeyCode);

    /// Dock the classifier panel.
    fn dock_widget(&mut self, name: &str, area: DockArea);
}
