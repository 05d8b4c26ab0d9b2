//! Error type for image stack loading.

/// Error type for loader operations.
#[derive(Debug, Clone)]
pub struct LoaderError {
    /// Human-readable error message.
    pub message: String,
    /// The file that produced this error (if known).
    pub source_name: Option<String>,
}

impl LoaderError {
    /// Create a new loader error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source_name: None,
        }
    }

    /// Create an error with file context.
    pub fn with_source(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(name) = &self.source_name {
            write!(f, "[{}] {}", name, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<std::io::Error> for LoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_source() {
        let plain = LoaderError::new("bad header");
        assert_eq!(plain.to_string(), "bad header");

        let named = LoaderError::new("bad header").with_source("cells.npy");
        assert_eq!(named.to_string(), "[cells.npy] bad header");
    }
}
