//! User-facing notices.
//!
//! The session queues notices for the host to show (status bar, toast, ...)
//! and mirrors each one to the log at the matching level.

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational message, not a problem
    Info,
    /// Something was skipped or replaced with a default
    Warning,
    /// An action failed
    Error,
}

/// What a notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A coordinate received its first (or an identical) class
    NewAnnotation,
    /// A coordinate's class was replaced by a different one
    Overwrite,
    /// A class was registered beyond the digit hotkey range
    ShortcutsUnavailable,
    /// Configured level names did not match the image dimensions
    LevelMismatch,
    /// A file extension has no registered format
    UnsupportedExtension,
    /// A table was loaded or generated
    TableLoaded,
    /// A table could not be loaded
    LoadFailed,
    /// A table was written
    TableSaved,
    /// A table could not be written
    SaveFailed,
    /// A class name was refused
    ClassRejected,
    /// A class could not be written at the current position
    ClassifyFailed,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Category
    pub kind: NoticeKind,
    /// Human-readable text
    pub message: String,
}

impl Notice {
    /// Create a new notice.
    pub fn new(level: NoticeLevel, kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            level,
            kind,
            message: message.into(),
        }
    }

    /// Create an info-level notice.
    pub fn info(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, kind, message)
    }

    /// Create a warning-level notice.
    pub fn warning(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, kind, message)
    }

    /// Create an error-level notice.
    pub fn error(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, kind, message)
    }

    /// Write this notice to the log.
    pub fn log(&self) {
        match self.level {
            NoticeLevel::Info => log::info!("{}", self.message),
            NoticeLevel::Warning => log::warn!("{}", self.message),
            NoticeLevel::Error => log::error!("{}", self.message),
        }
    }
}
