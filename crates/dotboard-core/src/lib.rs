//! Dotboard Core Library
//!
//! Platform-agnostic state and logic for the Dotboard canvas: the viewport
//! transform, inertial panning, the text object store, the interaction state
//! machine, and timed feedback animations. Everything is owned by a
//! [`Board`] and driven by host events plus a per-frame [`Board::tick`].

pub mod animation;
pub mod board;
pub mod camera;
pub mod clock;
pub mod config;
pub mod grid;
pub mod input;
pub mod interaction;
pub mod motion;
pub mod store;
pub mod text;
pub mod tools;

pub use animation::{AnimationKind, Animator, SELECTED_OPACITY};
pub use board::Board;
pub use camera::{Camera, ZoomDirection, wheel_zoom_factor};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BoardConfig, ConfigError, ConfigResult};
pub use grid::GridRegion;
pub use input::{CursorIcon, EventResponse, InputEvent, Key, Modifiers, MouseButton};
pub use interaction::InteractionState;
pub use motion::{Inertia, MotionPhase};
pub use store::TextStore;
pub use text::{ApproximateMeasurer, FontFamily, TextId, TextMeasurer, TextMetrics, TextObject};
pub use tools::ToolKind;
