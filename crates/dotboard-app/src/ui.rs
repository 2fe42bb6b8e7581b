//! UI components using egui.

use dotboard_core::{Board, FontFamily, ToolKind};
use egui::{Align2, Color32, Context, CornerRadius, Frame, Margin, Pos2, Sense, Stroke, Vec2};

/// Standard colors used across the UI.
mod theme {
    use egui::Color32;

    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
}

/// UI state mirrored from the board each frame, plus the text-entry form.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently selected tool (mirrored from the board).
    pub current_tool: ToolKind,
    /// Whether the dot grid is shown.
    pub grid_visible: bool,
    /// Current zoom level (1.0 = 100%).
    pub zoom_level: f64,
    /// Whether the text-entry dialog is open.
    pub text_entry_open: bool,
    /// Text typed into the dialog.
    pub text_input: String,
    /// Font chosen in the dialog.
    pub font_family: FontFamily,
    /// Focus the text field on the next frame.
    focus_text_input: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            grid_visible: true,
            zoom_level: 1.0,
            text_entry_open: false,
            text_input: String::new(),
            font_family: FontFamily::default(),
            focus_text_input: false,
        }
    }
}

impl UiState {
    /// Mirror board state. Opening a text entry clears the previous input.
    pub fn sync_from_board(&mut self, board: &Board) {
        self.current_tool = board.tool();
        self.grid_visible = board.grid_visible();
        self.zoom_level = board.camera.scale();

        let pending = board.is_text_entry_pending();
        if pending && !self.text_entry_open {
            self.text_input.clear();
            self.focus_text_input = true;
        }
        self.text_entry_open = pending;
    }
}

/// Actions that can be triggered by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Change the current tool.
    SetTool(ToolKind),
    /// Show or hide the grid.
    ToggleGrid,
    /// Zoom in.
    ZoomIn,
    /// Zoom out.
    ZoomOut,
    /// Confirm the text-entry dialog.
    ConfirmText { text: String, font: FontFamily },
    /// Cancel the text-entry dialog.
    CancelText,
}

/// Render all UI and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let toolbar_action = render_toolbar(ctx, ui_state);
    let bottom_action = render_bottom_toolbar(ctx, ui_state);
    let dialog_action = if ui_state.text_entry_open {
        render_text_entry_dialog(ctx, ui_state)
    } else {
        None
    };

    // The dialog takes precedence while open
    dialog_action.or(toolbar_action).or(bottom_action)
}

/// Render the tool toolbar and return any triggered action.
fn render_toolbar(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("toolbar"))
        .anchor(Align2::CENTER_TOP, Vec2::new(0.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(4.0, 0.0);

                    for tool in ToolKind::all() {
                        let label = format!("{} ({})", tool.display_name(), tool.shortcut());
                        if toggle_button(ui, &label, ui_state.current_tool == *tool) {
                            action = Some(UiAction::SetTool(*tool));
                        }
                    }

                    ui.add_space(8.0);
                    if toggle_button(ui, "Grid (G)", ui_state.grid_visible) {
                        action = Some(UiAction::ToggleGrid);
                    }
                });
            });
        });

    action
}

/// Render the bottom-left zoom controls.
fn render_bottom_toolbar(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("bottom_toolbar"))
        .anchor(Align2::LEFT_BOTTOM, Vec2::new(12.0, -12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(4.0, 0.0);
                    if toggle_button(ui, "\u{2212}", false) {
                        action = Some(UiAction::ZoomOut);
                    }
                    ui.label(
                        egui::RichText::new(format!("{:.0}%", ui_state.zoom_level * 100.0))
                            .size(12.0)
                            .color(theme::TEXT),
                    );
                    if toggle_button(ui, "+", false) {
                        action = Some(UiAction::ZoomIn);
                    }
                });
            });
        });

    action
}

/// Render the modal text-entry dialog.
fn render_text_entry_dialog(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    // Backdrop
    egui::Area::new(egui::Id::new("text_entry_backdrop"))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            let screen_rect = ctx.input(|i| i.content_rect());
            let response = ui.allocate_rect(screen_rect, Sense::click());
            ui.painter()
                .rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
            if response.clicked() {
                action = Some(UiAction::CancelText);
            }
        });

    // Modal window
    egui::Area::new(egui::Id::new("text_entry_dialog"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            Frame::new()
                .fill(Color32::WHITE)
                .corner_radius(CornerRadius::same(12))
                .stroke(Stroke::new(1.0, Color32::from_gray(200)))
                .inner_margin(Margin::same(20))
                .show(ui, |ui| {
                    ui.set_width(320.0);
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new("Add Text")
                                .size(16.0)
                                .strong()
                                .color(Color32::from_gray(30)),
                        );
                        ui.add_space(12.0);

                        let response = ui.add(
                            egui::TextEdit::singleline(&mut ui_state.text_input)
                                .desired_width(320.0)
                                .hint_text("Type something"),
                        );
                        if ui_state.focus_text_input {
                            response.request_focus();
                            ui_state.focus_text_input = false;
                        }

                        ui.add_space(8.0);
                        egui::ComboBox::from_id_salt("text_entry_font")
                            .selected_text(ui_state.font_family.display_name())
                            .show_ui(ui, |ui| {
                                for family in FontFamily::all() {
                                    ui.selectable_value(
                                        &mut ui_state.font_family,
                                        *family,
                                        family.display_name(),
                                    );
                                }
                            });

                        ui.add_space(12.0);

                        let (enter, escape) = ui.input(|i| {
                            (i.key_pressed(egui::Key::Enter), i.key_pressed(egui::Key::Escape))
                        });

                        ui.horizontal(|ui| {
                            if secondary_btn(ui, "Cancel") || escape {
                                action = Some(UiAction::CancelText);
                            }
                            if primary_btn(ui, "OK") || (enter && response.lost_focus()) {
                                action = Some(UiAction::ConfirmText {
                                    text: ui_state.text_input.trim().to_string(),
                                    font: ui_state.font_family,
                                });
                            }
                        });
                    });
                });
        });

    action
}

/// Common panel frame style.
fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(8))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(8))
}

/// Text button with a selected state. Returns true if clicked.
fn toggle_button(ui: &mut egui::Ui, label: &str, selected: bool) -> bool {
    let font_id = egui::FontId::proportional(12.0);
    let galley = ui
        .painter()
        .layout_no_wrap(label.to_string(), font_id.clone(), Color32::PLACEHOLDER);
    let size = Vec2::new(galley.size().x + 16.0, 26.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if selected {
            theme::ACCENT
        } else if response.hovered() {
            Color32::from_gray(235)
        } else {
            Color32::from_gray(245)
        };
        let text_color = if selected {
            Color32::WHITE
        } else {
            Color32::from_gray(80)
        };

        ui.painter()
            .rect_filled(rect, CornerRadius::same(4), bg_color);
        ui.painter()
            .text(rect.center(), Align2::CENTER_CENTER, label, font_id, text_color);
    }

    let clicked = response.clicked();
    response.on_hover_cursor(egui::CursorIcon::PointingHand);
    clicked
}

fn primary_btn(ui: &mut egui::Ui, label: &str) -> bool {
    ui.add(
        egui::Button::new(egui::RichText::new(label).color(Color32::WHITE))
            .fill(theme::ACCENT)
            .corner_radius(CornerRadius::same(4)),
    )
    .clicked()
}

fn secondary_btn(ui: &mut egui::Ui, label: &str) -> bool {
    ui.add(
        egui::Button::new(egui::RichText::new(label).color(theme::TEXT))
            .fill(Color32::from_gray(245))
            .corner_radius(CornerRadius::same(4)),
    )
    .clicked()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_opens_dialog_with_fresh_input() {
        let mut board = Board::default();
        let mut ui_state = UiState {
            text_input: "stale".to_string(),
            ..UiState::default()
        };

        board.set_tool(ToolKind::Text);
        ui_state.sync_from_board(&board);
        assert!(ui_state.text_entry_open);
        assert!(ui_state.text_input.is_empty());
        assert_eq!(ui_state.current_tool, ToolKind::Text);

        // Input typed while open survives later syncs.
        ui_state.text_input.push_str("Hi");
        ui_state.sync_from_board(&board);
        assert_eq!(ui_state.text_input, "Hi");

        board.cancel_text_entry();
        ui_state.sync_from_board(&board);
        assert!(!ui_state.text_entry_open);
    }

    #[test]
    fn test_sync_mirrors_grid_and_zoom() {
        let mut board = Board::default();
        board.toggle_grid();
        assert!(board.camera.set_scale(2.0));

        let mut ui_state = UiState::default();
        ui_state.sync_from_board(&board);
        assert!(!ui_state.grid_visible);
        assert!((ui_state.zoom_level - 2.0).abs() < f64::EPSILON);
    }
}
