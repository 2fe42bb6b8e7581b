//! Camera module for pan/zoom transforms.

use crate::config::BoardConfig;
use kurbo::{Affine, Point, Size, Vec2};

/// Direction of a keyboard zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Camera manages the view transform for the canvas.
///
/// It maps the unbounded virtual canvas onto the screen:
/// `screen = virtual * scale + offset`.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Screen-space translation of the virtual origin.
    pub offset: Vec2,
    /// Current zoom factor.
    scale: f64,
    /// Minimum allowed zoom factor.
    pub min_scale: f64,
    /// Maximum allowed zoom factor.
    pub max_scale: f64,
    /// Grid spacing in virtual units.
    pub grid_size: f64,
    /// Smallest on-screen grid pitch a zoom may produce.
    pub min_grid_pitch: f64,
    /// Viewport size in screen pixels.
    pub viewport_size: Size,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&BoardConfig::default())
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera using the bounds from a board config.
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: initial_scale(config),
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            grid_size: config.grid_size,
            min_grid_pitch: config.min_grid_pitch,
            viewport_size: Size::ZERO,
        }
    }

    /// Current zoom factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the zoom factor directly. Returns false if it violates the bounds.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !self.is_valid_scale(scale) {
            return false;
        }
        self.scale = scale;
        true
    }

    /// Whether a scale lies inside the bounds and keeps the grid visible.
    pub fn is_valid_scale(&self, scale: f64) -> bool {
        scale >= self.min_scale
            && scale <= self.max_scale
            && self.grid_size * scale >= self.min_grid_pitch
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts virtual coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to virtual coordinates.
    pub fn screen_to_virtual(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.offset.x) / self.scale,
            (screen_point.y - self.offset.y) / self.scale,
        )
    }

    /// Convert a virtual point to screen coordinates.
    pub fn virtual_to_screen(&self, virtual_point: Point) -> Point {
        Point::new(
            virtual_point.x * self.scale + self.offset.x,
            virtual_point.y * self.scale + self.offset.y,
        )
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping the virtual point under `screen_point` fixed.
    ///
    /// Returns false and leaves the camera untouched when the new scale would
    /// leave the bounds or shrink the grid pitch below the visibility limit.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) -> bool {
        let new_scale = self.scale * factor;
        if !factor.is_finite() || factor <= 0.0 || !self.is_valid_scale(new_scale) {
            log::trace!("Rejected zoom to {new_scale:.3}");
            return false;
        }

        let anchor = screen_point.to_vec2();
        self.offset = anchor - (anchor - self.offset) * factor;
        self.scale = new_scale;
        true
    }

    /// Zoom by one keyboard step around the viewport center.
    pub fn zoom_step(&mut self, direction: ZoomDirection, step: f64) -> bool {
        let factor = match direction {
            ZoomDirection::In => step,
            ZoomDirection::Out => 1.0 / step,
        };
        self.zoom_at(self.screen_center(), factor)
    }

    /// Update the viewport size (window resize).
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    /// Center of the viewport in screen coordinates.
    pub fn screen_center(&self) -> Point {
        Point::new(self.viewport_size.width / 2.0, self.viewport_size.height / 2.0)
    }

    /// Center of the viewport in virtual coordinates.
    pub fn viewport_center(&self) -> Point {
        self.screen_to_virtual(self.screen_center())
    }

    /// On-screen distance between grid lines.
    pub fn grid_pitch(&self) -> f64 {
        self.grid_size * self.scale
    }
}

/// Starting zoom: 100% unless that would hide the grid, then the smallest
/// scale that keeps it visible. Never exceeds `max_scale`.
fn initial_scale(config: &BoardConfig) -> f64 {
    let lowest = config
        .min_scale
        .max(config.min_grid_pitch / config.grid_size);
    1.0_f64.max(lowest).min(config.max_scale)
}

/// Zoom factor for one wheel event.
///
/// Multiplicative, so continuous scrolling feels linear:
/// `exp(sign(-delta_y) * intensity * |delta_y|)`.
pub fn wheel_zoom_factor(delta_y: f64, intensity: f64) -> f64 {
    if delta_y == 0.0 {
        return 1.0;
    }
    ((-delta_y).signum() * intensity * delta_y.abs()).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9, "{a:?} != {b:?}");
        assert!((a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.scale() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_small_grid_starts_zoomed_in() {
        let config = BoardConfig::from_json(r#"{ "grid_size": 20.0 }"#).unwrap();
        let camera = Camera::from_config(&config);
        assert!((camera.scale() - 1.25).abs() < 1e-9);
        assert!(camera.grid_pitch() >= config.min_grid_pitch);
        assert!(camera.is_valid_scale(camera.scale()));
    }

    #[test]
    fn test_initial_scale_never_exceeds_max() {
        let config = BoardConfig {
            grid_size: 5.0,
            max_scale: 2.0,
            ..BoardConfig::default()
        };
        assert!(config.validate().is_err());
        let camera = Camera::from_config(&config);
        assert!((camera.scale() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_virtual_with_offset() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(50.0, 100.0);
        let world = camera.screen_to_virtual(Point::new(100.0, 200.0));
        assert_point_eq(world, Point::new(50.0, 100.0));
    }

    #[test]
    fn test_screen_to_virtual_with_zoom() {
        let mut camera = Camera::new();
        assert!(camera.set_scale(2.0));
        let world = camera.screen_to_virtual(Point::new(100.0, 200.0));
        assert_point_eq(world, Point::new(50.0, 100.0));
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        assert!(camera.set_scale(1.5));

        for p in [Point::new(123.0, 456.0), Point::new(-9000.5, 0.25), Point::ZERO] {
            let back = camera.screen_to_virtual(camera.virtual_to_screen(p));
            assert_point_eq(back, p);
        }
    }

    #[test]
    fn test_affine_matches_manual_mapping() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(-40.0, 75.0);
        assert!(camera.set_scale(2.5));
        let p = Point::new(12.0, -7.0);
        assert_point_eq(camera.transform() * p, camera.virtual_to_screen(p));
        assert_point_eq(camera.inverse_transform() * p, camera.screen_to_virtual(p));
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(17.0, -3.0);
        let anchor = Point::new(320.0, 240.0);
        let before = camera.screen_to_virtual(anchor);

        assert!(camera.zoom_at(anchor, 1.25));
        assert_point_eq(camera.screen_to_virtual(anchor), before);
    }

    #[test]
    fn test_wheel_scenario() {
        let mut camera = Camera::new();
        assert!(camera.set_scale(1.5));
        let anchor = Point::new(400.0, 300.0);
        let before = camera.screen_to_virtual(anchor);

        let factor = wheel_zoom_factor(-100.0, 0.001);
        assert!(camera.zoom_at(anchor, factor));
        assert!(camera.scale() > 1.5);
        assert_point_eq(camera.screen_to_virtual(anchor), before);
    }

    #[test]
    fn test_zoom_rejected_outside_bounds() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(5.0, 5.0);
        assert!(!camera.zoom_at(Point::ZERO, 0.001));
        assert!((camera.scale() - 1.0).abs() < f64::EPSILON);
        assert_eq!(camera.offset, Vec2::new(5.0, 5.0));

        assert!(!camera.zoom_at(Point::ZERO, 1000.0));
        assert!((camera.scale() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_rejected_below_grid_pitch() {
        let config = BoardConfig {
            min_scale: 0.1,
            ..BoardConfig::default()
        };
        let mut camera = Camera::from_config(&config);
        // 50 * 0.4 = 20 < 25
        assert!(!camera.zoom_at(Point::ZERO, 0.4));
        assert!(camera.zoom_at(Point::ZERO, 0.5));
        assert!(camera.grid_pitch() >= 25.0);
    }

    #[test]
    fn test_zoom_sequence_stays_in_bounds() {
        let mut camera = Camera::new();
        let deltas = [-300.0, -500.0, -800.0, 250.0, 900.0, 1200.0, -50.0, 700.0, -2000.0];
        for (i, delta) in deltas.iter().cycle().take(200).enumerate() {
            let anchor = Point::new(i as f64 * 3.0, 100.0);
            camera.zoom_at(anchor, wheel_zoom_factor(*delta, 0.001));
            assert!(camera.scale() >= 0.5 && camera.scale() <= 3.0);
            assert!(camera.grid_pitch() >= 25.0);
        }
    }

    #[test]
    fn test_wheel_factor_direction() {
        assert!(wheel_zoom_factor(-100.0, 0.001) > 1.0);
        assert!(wheel_zoom_factor(100.0, 0.001) < 1.0);
        assert!((wheel_zoom_factor(0.0, 0.001) - 1.0).abs() < f64::EPSILON);
        assert!((wheel_zoom_factor(-100.0, 0.001) - 0.1_f64.exp()).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_step_around_center() {
        let mut camera = Camera::new();
        camera.set_viewport_size(Size::new(800.0, 600.0));
        let center = camera.viewport_center();
        assert!(camera.zoom_step(ZoomDirection::In, 1.1));
        assert_point_eq(camera.viewport_center(), center);
        assert!((camera.scale() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_pan_unbounded() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        camera.pan(Vec2::new(-1e9, 1e9));
        assert!((camera.offset.x - (10.0 - 1e9)).abs() < 1e-3);
        assert!((camera.offset.y - (20.0 + 1e9)).abs() < 1e-3);
    }

    #[test]
    fn test_viewport_center() {
        let mut camera = Camera::new();
        camera.set_viewport_size(Size::new(800.0, 600.0));
        camera.offset = Vec2::new(200.0, 100.0);
        assert_point_eq(camera.viewport_center(), Point::new(200.0, 200.0));
    }
}
