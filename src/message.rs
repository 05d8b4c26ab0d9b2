//! Classifier message types.
//!
//! All panel events and bound key presses are represented as messages in the
//! Elm architecture style and routed through
//! [`ClassifierSession::update`](crate::session::ClassifierSession::update).

use std::path::PathBuf;

use crate::keybindings::KeyCode;

/// Messages that can be sent to update the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierMessage {
    // IO panel
    /// Load dialog finished; None when cancelled
    LoadRequested(Option<PathBuf>),
    /// Save dialog finished; None when cancelled
    SaveRequested(Option<PathBuf>),

    // Class panel
    /// Class name text field changed
    NewClassTextChanged(String),
    /// Add the class typed in the text field
    AddClass,
    /// Class button clicked, by class index
    ClassClicked(usize),

    // Viewer
    /// A key bound through the viewer was pressed
    KeyPressed(KeyCode),
}
