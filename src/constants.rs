//! Global constants for the stack classifier

/// Name of the nullable label column in every annotation table
pub const CLASS_COLUMN: &str = "annotated_class";

/// Prefix for generated level names (`dim_0`, `dim_1`, ...)
pub const GENERIC_LEVEL_PREFIX: &str = "dim_";

/// Number of trailing axes treated as the 2-D image plane
pub const SPATIAL_DIMS: usize = 2;

/// Maximum number of classes that get a digit shortcut (keys 1-9)
pub const MAX_CLASS_HOTKEYS: usize = 9;

/// Name the panel is docked under
pub const DOCK_NAME: &str = "classifier";

/// Panel layout limits
pub mod panel {
    /// Maximum panel width in logical pixels
    pub const MAX_WIDTH: f32 = 225.0;

    /// Maximum panel height in logical pixels
    pub const MAX_HEIGHT: f32 = 350.0;

    /// Vertical spacing between panel rows
    pub const SPACING: f32 = 4.0;

    /// Label of the load button
    pub const LOAD_LABEL: &str = "Load metadata...";

    /// Label of the save button
    pub const SAVE_LABEL: &str = "Save...";

    /// Label of the add-class button
    pub const ADD_CLASS_LABEL: &str = "Add class";

    /// Title of the class group box
    pub const CLASSES_TITLE: &str = "classes";
}
