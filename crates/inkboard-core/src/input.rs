//! Input events for mouse, touch, wheel and keyboard.
//!
//! Positions are screen coordinates; the interaction controller converts
//! them to world space through the camera.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers. Touches report as [`MouseButton::Left`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    /// Single-pointer move. `movement` is the raw delta reported by a
    /// mouse; touches leave it empty and the controller derives the delta
    /// from the previous touch position.
    Move {
        position: Point,
        movement: Option<Vec2>,
    },
    Up {
        position: Point,
    },
    /// Two fingers on the surface.
    Pinch {
        first: Point,
        second: Point,
    },
    Wheel {
        position: Point,
        delta: Vec2,
    },
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key value as reported by the platform (`"z"`, `"Delete"`, ...).
    pub key: String,
    pub modifiers: Modifiers,
    /// Whether focus is inside a text field; editing keys are left to it.
    pub in_text_field: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            in_text_field: false,
        }
    }
}

/// Editor command bound to a key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    Undo,
    Redo,
    DeleteSelection,
}

impl Shortcut {
    /// Map a key event to a command.
    ///
    /// `Cmd/Ctrl+Z` undoes, `Cmd/Ctrl+Y` and `Cmd/Ctrl+Shift+Z` redo,
    /// `Delete`/`Backspace` outside text fields delete the selection.
    pub fn from_key(event: &KeyEvent) -> Option<Self> {
        let key = event.key.as_str();
        let command = event.modifiers.command();
        if command && key.eq_ignore_ascii_case("z") {
            return Some(if event.modifiers.shift { Shortcut::Redo } else { Shortcut::Undo });
        }
        if command && key.eq_ignore_ascii_case("y") {
            return Some(Shortcut::Redo);
        }
        if (key == "Delete" || key == "Backspace") && !event.in_text_field {
            return Some(Shortcut::DeleteSelection);
        }
        None
    }
}
