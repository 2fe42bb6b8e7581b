//! Translation of winit input into board events.

use dotboard_core::{CursorIcon, InputEvent, Key, Modifiers, MouseButton};
use kurbo::{Point, Size};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};

/// Pixels scrolled per wheel line.
pub const LINE_HEIGHT_PX: f64 = 20.0;

/// Tracks pointer and modifier state between winit events, in logical
/// pixels.
#[derive(Debug, Clone)]
pub struct EventHandler {
    /// Last known pointer position.
    pub pointer: Point,
    /// Current modifier keys.
    pub modifiers: Modifiers,
    /// Window scale factor.
    pub scale_factor: f64,
}

impl EventHandler {
    /// Create a new handler for a window with the given scale factor.
    pub fn new(scale_factor: f64) -> Self {
        Self {
            pointer: Point::ZERO,
            modifiers: Modifiers::default(),
            scale_factor,
        }
    }

    /// Convert a physical position to logical pixels.
    pub fn to_logical(&self, position: PhysicalPosition<f64>) -> Point {
        Point::new(position.x / self.scale_factor, position.y / self.scale_factor)
    }

    /// Convert a physical window size to logical pixels.
    pub fn logical_size(&self, size: PhysicalSize<u32>) -> Size {
        Size::new(
            size.width as f64 / self.scale_factor,
            size.height as f64 / self.scale_factor,
        )
    }

    /// Pointer moved to a physical position.
    pub fn pointer_moved(&mut self, position: PhysicalPosition<f64>) -> InputEvent {
        self.pointer = self.to_logical(position);
        InputEvent::PointerMove {
            position: self.pointer,
        }
    }

    /// Mouse button pressed or released at the last pointer position.
    pub fn button(
        &self,
        state: ElementState,
        button: winit::event::MouseButton,
    ) -> Option<InputEvent> {
        let button = map_button(button)?;
        let position = self.pointer;
        Some(match state {
            ElementState::Pressed => InputEvent::PointerDown { position, button },
            ElementState::Released => InputEvent::PointerUp { position, button },
        })
    }

    /// Wheel scrolled at the last pointer position.
    pub fn wheel(&self, delta: MouseScrollDelta) -> InputEvent {
        InputEvent::Wheel {
            position: self.pointer,
            delta_y: wheel_delta_y(delta, self.scale_factor),
            modifiers: self.modifiers,
        }
    }

    /// Key pressed.
    pub fn key(&self, key: &WinitKey) -> Option<InputEvent> {
        map_key(key).map(|key| InputEvent::Key {
            key,
            modifiers: self.modifiers,
        })
    }

    /// Window resized.
    pub fn resize(&self, size: PhysicalSize<u32>) -> InputEvent {
        InputEvent::Resize {
            size: self.logical_size(size),
            device_pixel_ratio: self.scale_factor,
        }
    }
}

/// Vertical wheel delta in logical pixels, positive when scrolling down.
///
/// winit reports positive values when scrolling up, so the sign flips.
pub fn wheel_delta_y(delta: MouseScrollDelta, scale_factor: f64) -> f64 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -(y as f64) * LINE_HEIGHT_PX,
        MouseScrollDelta::PixelDelta(pos) => -pos.y / scale_factor,
    }
}

pub fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

pub fn map_key(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Named(NamedKey::Delete) => Some(Key::Delete),
        WinitKey::Named(NamedKey::Backspace) => Some(Key::Backspace),
        WinitKey::Named(NamedKey::Enter) => Some(Key::Enter),
        WinitKey::Named(NamedKey::Escape) => Some(Key::Escape),
        WinitKey::Character(c) => Some(Key::from_name(c.as_str())),
        _ => None,
    }
}

pub fn map_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

pub fn map_cursor(cursor: CursorIcon) -> winit::window::CursorIcon {
    match cursor {
        CursorIcon::Default => winit::window::CursorIcon::Default,
        CursorIcon::Grab => winit::window::CursorIcon::Grab,
        CursorIcon::Grabbing => winit::window::CursorIcon::Grabbing,
        CursorIcon::Text => winit::window::CursorIcon::Text,
        CursorIcon::Move => winit::window::CursorIcon::Move,
        CursorIcon::ResizeVertical => winit::window::CursorIcon::NsResize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_delta_follows_web_convention() {
        // Scrolling up one line zooms in: negative delta.
        let delta = wheel_delta_y(MouseScrollDelta::LineDelta(0.0, 1.0), 1.0);
        assert!((delta + LINE_HEIGHT_PX).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pixel_delta_is_logical() {
        let delta = wheel_delta_y(
            MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -50.0)),
            2.0,
        );
        assert!((delta - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pointer_position_is_logical() {
        let mut handler = EventHandler::new(2.0);
        let event = handler.pointer_moved(PhysicalPosition::new(200.0, 100.0));
        assert_eq!(
            event,
            InputEvent::PointerMove {
                position: Point::new(100.0, 50.0)
            }
        );

        let down = handler
            .button(ElementState::Pressed, winit::event::MouseButton::Left)
            .unwrap();
        assert_eq!(
            down,
            InputEvent::PointerDown {
                position: Point::new(100.0, 50.0),
                button: MouseButton::Left,
            }
        );
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(&WinitKey::Named(NamedKey::Delete)), Some(Key::Delete));
        assert_eq!(map_key(&WinitKey::Character("=".into())), Some(Key::Equals));
        assert_eq!(map_key(&WinitKey::Character("-".into())), Some(Key::Minus));
        assert_eq!(map_key(&WinitKey::Named(NamedKey::Tab)), None);
    }

    #[test]
    fn test_modifier_mapping() {
        let modifiers = map_modifiers(ModifiersState::CONTROL | ModifiersState::SHIFT);
        assert!(modifiers.ctrl && modifiers.shift);
        assert!(!modifiers.alt && !modifiers.meta);
    }

    #[test]
    fn test_resize_event() {
        let handler = EventHandler::new(2.0);
        assert_eq!(
            handler.resize(PhysicalSize::new(1600, 1200)),
            InputEvent::Resize {
                size: Size::new(800.0, 600.0),
                device_pixel_ratio: 2.0,
            }
        );
    }
}
