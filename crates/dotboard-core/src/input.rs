//! Input events consumed by the board and the responses it produces.

use kurbo::{Point, Size};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Keys the board reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Enter,
    Escape,
    Plus,
    Minus,
    Equals,
    /// Any other key, by name.
    Other(String),
}

impl Key {
    /// Map a key name as reported by a browser or windowing layer.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            "+" => Key::Plus,
            "-" => Key::Minus,
            "=" => Key::Equals,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Host event, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Point, button: MouseButton },
    PointerMove { position: Point },
    PointerUp { position: Point, button: MouseButton },
    Wheel {
        position: Point,
        /// Vertical delta in pixels, positive = scroll down.
        delta_y: f64,
        modifiers: Modifiers,
    },
    Key { key: Key, modifiers: Modifiers },
    Resize { size: Size, device_pixel_ratio: f64 },
}

/// Cursor affordance for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    Grab,
    Grabbing,
    Text,
    Move,
    ResizeVertical,
}

/// What the board did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    /// The host should suppress its default handling.
    pub consumed: bool,
    /// The scene changed and should be redrawn.
    pub redraw: bool,
}

impl EventResponse {
    /// Event not used by the board.
    pub const IGNORED: Self = Self {
        consumed: false,
        redraw: false,
    };

    /// Event used; the scene changed.
    pub const REDRAW: Self = Self {
        consumed: true,
        redraw: true,
    };

    /// Event used without changing the scene.
    pub const CONSUMED: Self = Self {
        consumed: true,
        redraw: false,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("Delete"), Key::Delete);
        assert_eq!(Key::from_name("Backspace"), Key::Backspace);
        assert_eq!(Key::from_name("="), Key::Equals);
        assert_eq!(Key::from_name("a"), Key::Other("a".into()));
    }
}
