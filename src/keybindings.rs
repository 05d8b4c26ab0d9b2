//! Digit keybindings for class selection.
//!
//! Classes are bound to the digit keys in registration order: the first class
//! gets `1`, the ninth gets `9`. Classes registered after that have no hotkey.
//! The host forwards bound key presses back to the session, which resolves
//! them to a class index here.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_CLASS_HOTKEYS;

/// Keys the classifier can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
}

impl KeyCode {
    /// Key for a single decimal digit.
    pub fn from_digit(digit: u32) -> Option<Self> {
        match digit {
            0 => Some(KeyCode::Key0),
            1 => Some(KeyCode::Key1),
            2 => Some(KeyCode::Key2),
            3 => Some(KeyCode::Key3),
            4 => Some(KeyCode::Key4),
            5 => Some(KeyCode::Key5),
            6 => Some(KeyCode::Key6),
            7 => Some(KeyCode::Key7),
            8 => Some(KeyCode::Key8),
            9 => Some(KeyCode::Key9),
            _ => None,
        }
    }

    /// Parse a key label such as `"3"`.
    pub fn from_label(label: &str) -> Option<Self> {
        let mut chars = label.trim().chars();
        let digit = chars.next()?.to_digit(10)?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_digit(digit)
    }

    /// The digit this key types.
    pub fn digit(self) -> u32 {
        match self {
            KeyCode::Key0 => 0,
            KeyCode::Key1 => 1,
            KeyCode::Key2 => 2,
            KeyCode::Key3 => 3,
            KeyCode::Key4 => 4,
            KeyCode::Key5 => 5,
            KeyCode::Key6 => 6,
            KeyCode::Key7 => 7,
            KeyCode::Key8 => 8,
            KeyCode::Key9 => 9,
        }
    }
}

/// Convert a KeyCode to a display string.
pub fn key_to_string(key: KeyCode) -> &'static str {
    match key {
        KeyCode::Key0 => "0",
        KeyCode::Key1 => "1",
        KeyCode::Key2 => "2",
        KeyCode::Key3 => "3",
        KeyCode::Key4 => "4",
        KeyCode::Key5 => "5",
        KeyCode::Key6 => "6",
        KeyCode::Key7 => "7",
        KeyCode::Key8 => "8",
        KeyCode::Key9 => "9",
    }
}

/// Convert an optional KeyCode to a display string.
pub fn optional_key_to_string(key: Option<KeyCode>) -> &'static str {
    match key {
        Some(k) => key_to_string(k),
        None => "-",
    }
}

/// Class hotkeys bound so far in this session.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    /// Hotkeys for class selection (index 0 maps to the first class).
    /// None means the slot has not been bound yet.
    class_hotkeys: [Option<KeyCode>; MAX_CLASS_HOTKEYS],
}

impl KeyBindings {
    /// Create an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// The key a class at `index` (0-based) is entitled to, if any.
    pub fn default_key_for_class_index(index: usize) -> Option<KeyCode> {
        if index < MAX_CLASS_HOTKEYS {
            KeyCode::from_digit(index as u32 + 1)
        } else {
            None
        }
    }

    /// Bind the hotkey for the class at `index`, returning the bound key.
    pub fn bind_class(&mut self, index: usize) -> Option<KeyCode> {
        let key = Self::default_key_for_class_index(index)?;
        self.class_hotkeys[index] = Some(key);
        Some(key)
    }

    /// Get the class index (0-based) that corresponds to a key press, if any.
    pub fn class_index_for_key(&self, key: KeyCode) -> Option<usize> {
        self.class_hotkeys
            .iter()
            .position(|hotkey| *hotkey == Some(key))
    }

    /// Get the hotkey for a class at a specific index, if bound.
    pub fn key_for_class_index(&self, index: usize) -> Option<KeyCode> {
        self.class_hotkeys.get(index).copied().flatten()
    }

    /// Number of bound class hotkeys.
    pub fn bound_count(&self) -> usize {
        self.class_hotkeys.iter().flatten().count()
    }
}
