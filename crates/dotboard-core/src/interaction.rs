//! Pointer, wheel, and keyboard dispatch for the board.
//!
//! Every event is evaluated once against the current tool and interaction
//! state; there are no per-tool handlers to attach or detach.

use crate::board::Board;
use crate::camera::{ZoomDirection, wheel_zoom_factor};
use crate::input::{CursorIcon, EventResponse, InputEvent, Key, Modifiers, MouseButton};
use crate::text::{FontFamily, TextId};
use crate::tools::ToolKind;
use kurbo::{Point, Size, Vec2};

/// What the pointer is currently doing. Exactly one state is active.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Dragging empty canvas with the pan tool.
    PanDragging,
    /// Moving a text object.
    TextDragging {
        id: TextId,
        /// Pointer position relative to the object, in virtual units.
        grab_offset: Vec2,
    },
    /// Dragging the font-resize handle of the selected object.
    FontResizing {
        id: TextId,
        base_size: f64,
        /// Screen Y where the drag started.
        start_y: f64,
    },
    /// Waiting for the host's text-entry surface to confirm or cancel.
    TextEntryPending {
        /// Virtual insertion point; `None` means the viewport center at
        /// confirm time.
        anchor: Option<Point>,
    },
}

impl InteractionState {
    /// Whether a pointer drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            InteractionState::PanDragging
                | InteractionState::TextDragging { .. }
                | InteractionState::FontResizing { .. }
        )
    }

    pub fn is_text_entry_pending(&self) -> bool {
        matches!(self, InteractionState::TextEntryPending { .. })
    }

    /// Text object this state operates on, if any.
    pub fn target(&self) -> Option<TextId> {
        match self {
            InteractionState::TextDragging { id, .. } | InteractionState::FontResizing { id, .. } => {
                Some(*id)
            }
            _ => None,
        }
    }
}

impl Board {
    /// Dispatch one host event.
    pub fn handle_event(&mut self, event: &InputEvent) -> EventResponse {
        match event {
            InputEvent::PointerDown { position, button } => self.pointer_down(*position, *button),
            InputEvent::PointerMove { position } => self.pointer_move(*position),
            InputEvent::PointerUp { position, button } => self.pointer_up(*position, *button),
            InputEvent::Wheel {
                position,
                delta_y,
                modifiers,
            } => self.wheel(*position, *delta_y, *modifiers),
            InputEvent::Key { key, modifiers } => self.key(key, *modifiers),
            InputEvent::Resize {
                size,
                device_pixel_ratio,
            } => self.resize(*size, *device_pixel_ratio),
        }
    }

    fn pointer_down(&mut self, position: Point, button: MouseButton) -> EventResponse {
        self.pointer = Some(position);
        if button != MouseButton::Left || self.state != InteractionState::Idle {
            return EventResponse::IGNORED;
        }

        if self.hit_resize_handle(position) {
            if let Some((id, base_size)) = self
                .selected_object()
                .map(|object| (object.id(), object.font_size))
            {
                self.motion.cancel();
                self.state = InteractionState::FontResizing {
                    id,
                    base_size,
                    start_y: position.y,
                };
                log::debug!("Font resize started at {base_size:.1}px");
                return EventResponse::REDRAW;
            }
        }

        let virtual_point = self.camera.screen_to_virtual(position);

        if let Some(id) = self.hit_test(virtual_point) {
            if self.selected.is_some_and(|selected| selected != id) {
                self.deselect();
            }
            self.select(id);
            let grab_offset = self
                .store
                .get(id)
                .map(|object| virtual_point - object.position)
                .unwrap_or(Vec2::ZERO);
            self.motion.cancel();
            self.state = InteractionState::TextDragging { id, grab_offset };
            self.hovered = Some(id);
            return EventResponse::REDRAW;
        }

        if self.deselect() {
            return EventResponse::REDRAW;
        }

        match self.tool {
            ToolKind::Pan => {
                let now = self.now();
                self.motion.begin(position, now);
                self.state = InteractionState::PanDragging;
                EventResponse::CONSUMED
            }
            ToolKind::Text => {
                self.begin_text_entry(Some(virtual_point));
                EventResponse::REDRAW
            }
        }
    }

    fn pointer_move(&mut self, position: Point) -> EventResponse {
        self.pointer = Some(position);
        match self.state {
            InteractionState::PanDragging => {
                let now = self.now();
                let delta = self.motion.drag_to(position, now);
                self.camera.pan(delta);
                EventResponse::REDRAW
            }
            InteractionState::TextDragging { id, grab_offset } => {
                let target = self.camera.screen_to_virtual(position) - grab_offset;
                if self.store.update_position(id, target) {
                    EventResponse::REDRAW
                } else {
                    self.state = InteractionState::Idle;
                    EventResponse::IGNORED
                }
            }
            InteractionState::FontResizing {
                id,
                base_size,
                start_y,
            } => {
                if self.store.update_font_size(id, base_size + (start_y - position.y)) {
                    EventResponse::REDRAW
                } else {
                    self.state = InteractionState::Idle;
                    EventResponse::IGNORED
                }
            }
            InteractionState::Idle => {
                self.update_hover(position);
                EventResponse::IGNORED
            }
            InteractionState::TextEntryPending { .. } => EventResponse::IGNORED,
        }
    }

    fn pointer_up(&mut self, position: Point, button: MouseButton) -> EventResponse {
        if button != MouseButton::Left {
            return EventResponse::IGNORED;
        }
        match self.state {
            InteractionState::PanDragging => {
                let now = self.now();
                self.state = InteractionState::Idle;
                if self.motion.release(now) {
                    EventResponse::REDRAW
                } else {
                    EventResponse::CONSUMED
                }
            }
            InteractionState::TextDragging { .. } | InteractionState::FontResizing { .. } => {
                self.state = InteractionState::Idle;
                self.update_hover(position);
                EventResponse::REDRAW
            }
            InteractionState::Idle | InteractionState::TextEntryPending { .. } => {
                EventResponse::IGNORED
            }
        }
    }

    fn wheel(&mut self, position: Point, delta_y: f64, modifiers: Modifiers) -> EventResponse {
        if self.state.is_text_entry_pending() {
            return EventResponse {
                consumed: modifiers.ctrl,
                redraw: false,
            };
        }
        let factor = wheel_zoom_factor(delta_y, self.config.zoom_intensity);
        let changed = self.camera.zoom_at(position, factor);
        if changed {
            self.update_hover(position);
        }
        EventResponse {
            consumed: changed || modifiers.ctrl,
            redraw: changed,
        }
    }

    fn key(&mut self, key: &Key, _modifiers: Modifiers) -> EventResponse {
        if self.state.is_text_entry_pending() {
            return match key {
                Key::Escape => {
                    self.cancel_text_entry();
                    EventResponse::REDRAW
                }
                _ => EventResponse::IGNORED,
            };
        }

        match key {
            Key::Delete | Key::Backspace => {
                if self.delete_selected() {
                    EventResponse::REDRAW
                } else {
                    EventResponse::IGNORED
                }
            }
            Key::Escape => {
                if self.state.is_dragging() {
                    return EventResponse::IGNORED;
                }
                if self.deselect() {
                    EventResponse::REDRAW
                } else {
                    EventResponse::IGNORED
                }
            }
            Key::Plus | Key::Equals => self.keyboard_zoom(ZoomDirection::In),
            Key::Minus => self.keyboard_zoom(ZoomDirection::Out),
            Key::Enter | Key::Other(_) => EventResponse::IGNORED,
        }
    }

    fn keyboard_zoom(&mut self, direction: ZoomDirection) -> EventResponse {
        if self.camera.zoom_step(direction, self.config.zoom_step) {
            if let Some(pointer) = self.pointer {
                if self.state == InteractionState::Idle {
                    self.update_hover(pointer);
                }
            }
            EventResponse::REDRAW
        } else {
            EventResponse::CONSUMED
        }
    }

    fn resize(&mut self, size: Size, device_pixel_ratio: f64) -> EventResponse {
        self.set_viewport_size(size);
        if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            self.device_pixel_ratio = device_pixel_ratio;
        }
        EventResponse::REDRAW
    }

    fn update_hover(&mut self, position: Point) {
        self.hovering_handle = self.hit_resize_handle(position);
        self.hovered = if self.hovering_handle {
            None
        } else {
            self.hit_test(self.camera.screen_to_virtual(position))
        };
    }

    /// Switch the active tool.
    ///
    /// Ignored (returns false) while a drag is in progress. Switching to the
    /// text tool opens a text entry at the viewport center.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        if self.state.is_dragging() {
            log::debug!("Ignoring switch to {tool:?} during drag");
            return false;
        }
        if self.tool != tool {
            log::debug!("Tool: {:?} -> {:?}", self.tool, tool);
        }
        self.tool = tool;
        match tool {
            ToolKind::Text => {
                self.begin_text_entry(None);
            }
            ToolKind::Pan => {
                if self.state.is_text_entry_pending() {
                    self.state = InteractionState::Idle;
                }
            }
        }
        true
    }

    /// Show or hide the dot grid. Returns the new visibility.
    pub fn toggle_grid(&mut self) -> bool {
        self.grid_visible = !self.grid_visible;
        self.grid_visible
    }

    /// Open a text entry. `None` inserts at the viewport center on confirm.
    ///
    /// Returns false while a drag is in progress.
    pub fn begin_text_entry(&mut self, anchor: Option<Point>) -> bool {
        if self.state.is_dragging() {
            return false;
        }
        self.state = InteractionState::TextEntryPending { anchor };
        true
    }

    /// Whether the host should show its text-entry surface.
    pub fn is_text_entry_pending(&self) -> bool {
        self.state.is_text_entry_pending()
    }

    /// Confirm the pending text entry.
    ///
    /// The text is trimmed; blank input creates nothing. Without a pending
    /// entry the object is placed at the viewport center.
    pub fn confirm_text_entry(&mut self, text: &str, font: Option<FontFamily>) -> Option<TextId> {
        let anchor = match self.state {
            InteractionState::TextEntryPending { anchor } => anchor,
            _ => None,
        };
        if self.state.is_text_entry_pending() {
            self.state = InteractionState::Idle;
        }
        let position = anchor.unwrap_or_else(|| self.camera.viewport_center());
        self.store.insert(text, position, font)
    }

    /// Discard the pending text entry. Returns false if none was pending.
    pub fn cancel_text_entry(&mut self) -> bool {
        if !self.state.is_text_entry_pending() {
            return false;
        }
        self.state = InteractionState::Idle;
        log::debug!("Text entry cancelled");
        true
    }

    /// Object under the pointer when idle.
    pub fn hovered(&self) -> Option<TextId> {
        self.hovered
    }

    /// Cursor affordance for the current tool and state.
    pub fn cursor(&self) -> CursorIcon {
        match self.state {
            InteractionState::PanDragging => CursorIcon::Grabbing,
            InteractionState::TextDragging { .. } => CursorIcon::Move,
            InteractionState::FontResizing { .. } => CursorIcon::ResizeVertical,
            InteractionState::TextEntryPending { .. } => CursorIcon::Default,
            InteractionState::Idle => {
                if self.hovering_handle {
                    CursorIcon::ResizeVertical
                } else if self.hovered.is_some() {
                    CursorIcon::Move
                } else {
                    match self.tool {
                        ToolKind::Pan => CursorIcon::Grab,
                        ToolKind::Text => CursorIcon::Text,
                    }
                }
            }
        }
    }
}
