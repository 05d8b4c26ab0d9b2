//! Class registry for the classifier.

use crate::constants::MAX_CLASS_HOTKEYS;

/// Errors raised when registering a class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassError {
    /// Name is empty after trimming
    #[error("Class name is empty")]
    EmptyName,

    /// Name is already registered
    #[error("Class '{0}' already exists")]
    Duplicate(String),
}

/// A registered annotation class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationClass {
    /// Position in the registry (0-based)
    pub index: usize,
    /// Display name, also the value written to the table
    pub name: String,
}

impl AnnotationClass {
    /// 1-based shortcut number, if this class is within the hotkey range.
    pub fn shortcut_number(&self) -> Option<usize> {
        (self.index < MAX_CLASS_HOTKEYS).then_some(self.index + 1)
    }

    /// Button label: the name, followed by the shortcut number when bound.
    pub fn button_label(&self) -> String {
        match self.shortcut_number() {
            Some(n) => format!("{} ({})", self.name, n),
            None => self.name.clone(),
        }
    }
}

/// Insertion-ordered, append-only list of class names.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: Vec<AnnotationClass>,
}

impl ClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a class. The name is trimmed before it is stored.
    pub fn register(&mut self, name: &str) -> Result<&AnnotationClass, ClassError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClassError::EmptyName);
        }
        if self.contains(name) {
            return Err(ClassError::Duplicate(name.to_string()));
        }

        let index = self.classes.len();
        self.classes.push(AnnotationClass {
            index,
            name: name.to_string(),
        });
        Ok(&self.classes[index])
    }

    /// Whether a class with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c.name == name)
    }

    /// Class at a position.
    pub fn get(&self, index: usize) -> Option<&AnnotationClass> {
        self.classes.get(index)
    }

    /// All classes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AnnotationClass> {
        self.classes.iter()
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no class has been registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_in_order() {
        let mut registry = ClassRegistry::new();
        registry.register("alive").unwrap();
        registry.register("  dead ").unwrap();

        let names: Vec<_> = registry.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alive", "dead"]);
        assert_eq!(registry.get(1).unwrap().index, 1);
    }

    #[test]
    fn test_register_rejects_empty_and_duplicates() {
        let mut registry = ClassRegistry::new();
        assert_eq!(registry.register("   ").unwrap_err(), ClassError::EmptyName);

        registry.register("alive").unwrap();
        assert_eq!(
            registry.register("alive").unwrap_err(),
            ClassError::Duplicate("alive".to_string())
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_button_labels() {
        let mut registry = ClassRegistry::new();
        for i in 0..10 {
            registry.register(&format!("c{}", i)).unwrap();
        }

        assert_eq!(registry.get(0).unwrap().button_label(), "c0 (1)");
        assert_eq!(registry.get(8).unwrap().button_label(), "c8 (9)");
        assert_eq!(registry.get(9).unwrap().button_label(), "c9");
        assert_eq!(registry.get(9).unwrap().shortcut_number(), None);
    }
}
