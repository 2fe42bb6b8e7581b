//! Vello renderer implementation.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use crate::text_layout::{build_layout, first_baseline, layout_metrics};
use dotboard_core::{Board, GridRegion, TextObject};
use kurbo::{Affine, BezPath, Circle, Point, Rect, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext};
use peniko::{Brush, Color, Fill};
use vello::wgpu::{Device, Queue, TextureView};
use vello::{RenderParams, RendererOptions, Scene};

/// Half-size of a grid dot in screen pixels.
const DOT_SIZE: f64 = 1.5;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Selection highlight color.
    selection_color: Color,
    /// Font context for text rendering.
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    /// Current zoom level (for zoom-independent UI elements).
    zoom: f64,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            zoom: 1.0,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Render the dot grid covering the viewport.
    fn render_grid_dots(&mut self, board: &Board, viewport: Rect, transform: Affine, color: Color) {
        let region = GridRegion::visible(&board.camera, viewport);
        let half = DOT_SIZE / self.zoom;

        // Batch all dots into a single path for performance
        let mut path = BezPath::new();
        for dot in region.dots() {
            path.move_to(Point::new(dot.x - half, dot.y - half));
            path.line_to(Point::new(dot.x + half, dot.y - half));
            path.line_to(Point::new(dot.x + half, dot.y + half));
            path.line_to(Point::new(dot.x - half, dot.y + half));
            path.close_path();
        }

        self.scene.fill(Fill::NonZero, transform, color, None, &path);
    }

    /// Render one text object centered on its position.
    fn render_text(&mut self, object: &TextObject, transform: Affine, color: Color) {
        if object.opacity <= 0.0 {
            return;
        }
        let color = color.multiply_alpha(object.opacity as f32);
        let brush = Brush::Solid(color);

        let layout = build_layout(
            &mut self.font_cx,
            &mut self.layout_cx,
            &object.text,
            object.font_family,
            object.font_size,
            brush.clone(),
        );
        let metrics = layout_metrics(&layout, &object.text, object.font_family, object.font_size);

        // Scale animations grow/shrink around the object's center.
        let text_transform = transform
            * Affine::translate(object.position.to_vec2())
            * Affine::scale(object.scale);
        let dx = -metrics.width / 2.0;
        let dy = metrics.baseline_at(Point::ZERO) - first_baseline(&layout);

        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        glyph_count += 1;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx + dx as f32,
                            y: gy + dy as f32,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        // No font resolved: draw the measured box so the object stays visible.
        if glyph_count == 0 && !object.text.is_empty() {
            let rect = metrics.bounds_at(Point::ZERO);
            self.scene.fill(
                Fill::NonZero,
                text_transform,
                color.multiply_alpha(0.4),
                None,
                &rect,
            );
        }
    }

    /// Outline around a text object's hit box.
    fn render_outline(&mut self, bounds: Rect, transform: Affine, color: Color, width: f64) {
        let stroke = Stroke::new(width / self.zoom).with_dashes(0.0, [4.0 / self.zoom, 4.0 / self.zoom]);
        self.scene.stroke(&stroke, transform, color, None, &bounds);
    }

    /// Font-resize handle, drawn in screen space.
    fn render_resize_handle(&mut self, center: Point, radius: f64, screen_transform: Affine) {
        let circle = Circle::new(center, radius);

        // White fill
        self.scene
            .fill(Fill::NonZero, screen_transform, Color::WHITE, None, &circle);

        // Blue border
        self.scene.stroke(
            &Stroke::new(2.0),
            screen_transform,
            self.selection_color,
            None,
            &circle,
        );
    }
}

/// GPU side of the Vello pipeline: rasterizes built scenes into a texture.
pub struct GpuRenderer {
    renderer: vello::Renderer,
}

impl GpuRenderer {
    /// Create the Vello GPU renderer for a device.
    pub fn new(device: &Device) -> RenderResult<Self> {
        let renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;
        Ok(Self { renderer })
    }

    /// Render a scene into a storage-capable texture view.
    pub fn render_to_texture(
        &mut self,
        device: &Device,
        queue: &Queue,
        scene: &Scene,
        view: &TextureView,
        params: &RenderParams,
    ) -> RenderResult<()> {
        self.renderer
            .render_to_texture(device, queue, scene, view, params)
            .map_err(|e| RendererError::RenderFailed(e.to_string()))
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        // Clear the scene
        self.scene.reset();
        self.selection_color = ctx.selection_color;

        let board = ctx.board;
        self.zoom = board.camera.scale();

        let screen_transform = Affine::scale(ctx.scale_factor);
        let camera_transform = screen_transform * board.camera.transform();

        if ctx.draws_grid() {
            self.render_grid_dots(board, ctx.viewport(), camera_transform, ctx.grid_color);
        }

        // Store order is draw order.
        for object in board.store().iter() {
            self.render_text(object, camera_transform, ctx.text_color);
        }

        let hover_bounds = board
            .hovered()
            .filter(|id| !board.is_selected(*id))
            .and_then(|id| board.hit_bounds(id));
        if let Some(bounds) = hover_bounds {
            let color = ctx.selection_color.multiply_alpha(0.4);
            self.render_outline(bounds, camera_transform, color, 1.0);
        }

        if let Some(selected) = board.selected().filter(|id| !board.is_deleting(*id)) {
            if let Some(bounds) = board.hit_bounds(selected) {
                self.render_outline(bounds, camera_transform, ctx.selection_color, 1.5);
            }
            if let Some(handle) = board.resize_handle() {
                let radius = board.config().resize_handle_radius;
                self.render_resize_handle(handle, radius, screen_transform);
            }
        }
    }
}
