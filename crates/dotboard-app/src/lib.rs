//! Dotboard Application
//!
//! The native application shell: windowing, input translation,
//! egui overlays, and the frame loop driving the board.

mod app;
mod event_handler;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig, AppError, CONFIG_ENV};
pub use event_handler::EventHandler;
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use ui::{UiAction, UiState, render_ui};
