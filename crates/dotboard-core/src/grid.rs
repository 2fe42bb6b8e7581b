//! Visible region of the dot grid.

use crate::camera::Camera;
use kurbo::{Point, Rect};

/// Grid intersections covering a viewport, in virtual coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRegion {
    /// First grid intersection (top-left), aligned to the grid.
    pub start: Point,
    /// Last grid intersection (bottom-right), aligned to the grid.
    pub end: Point,
    /// Grid spacing in virtual units.
    pub step: f64,
}

impl GridRegion {
    /// Grid region covering `viewport` (screen coordinates) under `camera`.
    pub fn visible(camera: &Camera, viewport: Rect) -> Self {
        let step = camera.grid_size;
        let top_left = camera.screen_to_virtual(Point::new(viewport.x0, viewport.y0));
        let bottom_right = camera.screen_to_virtual(Point::new(viewport.x1, viewport.y1));

        Self {
            start: Point::new(
                (top_left.x / step).floor() * step,
                (top_left.y / step).floor() * step,
            ),
            end: Point::new(
                (bottom_right.x / step).ceil() * step,
                (bottom_right.y / step).ceil() * step,
            ),
            step,
        }
    }

    /// Number of columns of dots.
    pub fn columns(&self) -> usize {
        Self::span(self.start.x, self.end.x, self.step)
    }

    /// Number of rows of dots.
    pub fn rows(&self) -> usize {
        Self::span(self.start.y, self.end.y, self.step)
    }

    /// Every grid intersection in the region, row by row.
    pub fn dots(&self) -> impl Iterator<Item = Point> + '_ {
        let columns = self.columns();
        (0..self.rows()).flat_map(move |row| {
            let y = self.start.y + row as f64 * self.step;
            (0..columns).map(move |col| Point::new(self.start.x + col as f64 * self.step, y))
        })
    }

    fn span(start: f64, end: f64, step: f64) -> usize {
        if step <= 0.0 || end < start {
            return 0;
        }
        ((end - start) / step).round() as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Size, Vec2};

    #[test]
    fn test_region_aligned_to_grid() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(-30.0, 10.0);
        let region = GridRegion::visible(&camera, Rect::new(0.0, 0.0, 200.0, 100.0));

        // Virtual view spans x 30..230, y -10..90.
        assert!((region.start.x - 0.0).abs() < 1e-9);
        assert!((region.start.y - -50.0).abs() < 1e-9);
        assert!((region.end.x - 250.0).abs() < 1e-9);
        assert!((region.end.y - 100.0).abs() < 1e-9);
        assert_eq!(region.columns(), 6);
        assert_eq!(region.rows(), 4);
    }

    #[test]
    fn test_dots_cover_viewport() {
        let mut camera = Camera::new();
        camera.set_viewport_size(Size::new(400.0, 300.0));
        assert!(camera.set_scale(2.0));
        camera.offset = Vec2::new(13.0, -77.0);
        let viewport = Rect::new(0.0, 0.0, 400.0, 300.0);
        let region = GridRegion::visible(&camera, viewport);

        let dots: Vec<_> = region.dots().collect();
        assert_eq!(dots.len(), region.rows() * region.columns());
        for dot in &dots {
            assert!((dot.x / region.step).fract().abs() < 1e-9);
        }
        let screen_min = camera.virtual_to_screen(dots[0]);
        let screen_max = camera.virtual_to_screen(*dots.last().unwrap());
        assert!(screen_min.x <= 0.0 && screen_min.y <= 0.0);
        assert!(screen_max.x >= 400.0 && screen_max.y >= 300.0);
    }
}
