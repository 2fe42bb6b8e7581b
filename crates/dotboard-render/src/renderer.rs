//! Renderer trait abstraction.

use dotboard_core::Board;
use kurbo::{Rect, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid (plain background).
    None,
    /// Dots at grid intersections.
    #[default]
    Dots,
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The board to render.
    pub board: &'a Board,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI), as last reported to the board.
    pub scale_factor: f64,
    /// Grid display style. Ignored while the board hides its grid.
    pub grid_style: GridStyle,
    /// Grid dot color.
    pub grid_color: Color,
    /// Text color (before animation opacity).
    pub text_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(board: &'a Board, viewport_size: Size) -> Self {
        Self {
            board,
            viewport_size,
            scale_factor: board.device_pixel_ratio(),
            grid_style: GridStyle::Dots,
            grid_color: Color::from_rgba8(160, 160, 160, 140),
            text_color: Color::from_rgba8(30, 30, 30, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
        }
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Visible screen area in logical pixels.
    pub fn viewport(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.viewport_size)
    }

    /// Whether the grid should be drawn this frame.
    pub fn draws_grid(&self) -> bool {
        self.board.grid_visible() && self.grid_style != GridStyle::None
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);
}

#[cfg(test)]
mod tests {
    use super::*;

    use dotboard_core::InputEvent;

    #[test]
    fn test_scale_factor_follows_board() {
        let mut board = Board::default();
        assert!((RenderContext::new(&board, Size::ZERO).scale_factor - 1.0).abs() < f64::EPSILON);

        board.handle_event(&InputEvent::Resize {
            size: Size::new(640.0, 480.0),
            device_pixel_ratio: 2.0,
        });
        let ctx = RenderContext::new(&board, Size::new(640.0, 480.0));
        assert!((ctx.scale_factor - 2.0).abs() < f64::EPSILON);
        assert_eq!(ctx.viewport(), Rect::new(0.0, 0.0, 640.0, 480.0));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RendererError::Surface("lost".into()).to_string(),
            "Surface error: lost"
        );
        assert_eq!(
            RendererError::InitFailed("no adapter".into()).to_string(),
            "Initialization failed: no adapter"
        );
    }

    #[test]
    fn test_grid_follows_board_toggle() {
        let mut board = Board::default();
        let ctx = RenderContext::new(&board, Size::new(800.0, 600.0));
        assert!(ctx.draws_grid());
        assert!(!ctx.with_grid(GridStyle::None).draws_grid());

        board.toggle_grid();
        let ctx = RenderContext::new(&board, Size::new(800.0, 600.0));
        assert!(!ctx.draws_grid());
    }
}
