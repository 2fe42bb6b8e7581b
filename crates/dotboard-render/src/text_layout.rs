//! Parley text layout shared by drawing and measurement.
//!
//! The renderer and [`ParleyMeasurer`] both go through [`build_layout`], so
//! hit boxes are computed from exactly the layout that gets drawn.

use dotboard_core::{ApproximateMeasurer, FontFamily, TextMeasurer, TextMetrics};
use parley::{FontContext, Layout, LayoutContext, StyleProperty};
use peniko::{Brush, Color};
use std::cell::RefCell;

/// Lay out a single text object with its font configuration.
pub(crate) fn build_layout(
    font_cx: &mut FontContext,
    layout_cx: &mut LayoutContext<Brush>,
    text: &str,
    family: FontFamily,
    font_size: f64,
    brush: Brush,
) -> Layout<Brush> {
    let mut builder = layout_cx.ranged_builder(font_cx, text, 1.0, false);
    builder.push_default(StyleProperty::FontSize(font_size as f32));
    builder.push_default(StyleProperty::Brush(brush));
    builder.push_default(StyleProperty::FontStack(parley::FontStack::Source(
        family.font_stack().into(),
    )));
    let mut layout = builder.build(text);
    layout.break_all_lines(None);
    layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());
    layout
}

/// Extents of a layout, falling back to approximate metrics when no font
/// could be resolved.
pub(crate) fn layout_metrics(
    layout: &Layout<Brush>,
    text: &str,
    family: FontFamily,
    font_size: f64,
) -> TextMetrics {
    let first_line = layout.lines().next().map(|line| {
        let metrics = line.metrics();
        (metrics.ascent as f64, metrics.descent as f64)
    });
    let width = layout.width() as f64;

    match first_line {
        Some((ascent, descent)) if ascent + descent > 0.0 && (width > 0.0 || text.is_empty()) => {
            TextMetrics {
                width,
                ascent,
                descent,
            }
        }
        _ => {
            log::trace!("No font resolved for {family}; using approximate metrics");
            ApproximateMeasurer.measure(text, family, font_size)
        }
    }
}

/// Baseline of the first line, measured from the top of the layout.
pub(crate) fn first_baseline(layout: &Layout<Brush>) -> f64 {
    layout
        .lines()
        .next()
        .map(|line| line.metrics().baseline as f64)
        .unwrap_or(0.0)
}

/// Text measurement through parley, using the same font stacks as the
/// Vello renderer.
pub struct ParleyMeasurer {
    contexts: RefCell<(FontContext, LayoutContext<Brush>)>,
}

impl Default for ParleyMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyMeasurer {
    /// Create a new measurer with its own font and layout contexts.
    pub fn new() -> Self {
        Self {
            contexts: RefCell::new((FontContext::new(), LayoutContext::new())),
        }
    }
}

impl TextMeasurer for ParleyMeasurer {
    fn measure(&self, text: &str, family: FontFamily, font_size: f64) -> TextMetrics {
        let mut contexts = self.contexts.borrow_mut();
        let (font_cx, layout_cx) = &mut *contexts;
        let brush = Brush::Solid(Color::BLACK);
        let layout = build_layout(font_cx, layout_cx, text, family, font_size, brush);
        layout_metrics(&layout, text, family, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_has_extent() {
        let measurer = ParleyMeasurer::new();
        let metrics = measurer.measure("Hello", FontFamily::IranSans, 48.0);
        assert!(metrics.width > 0.0);
        assert!(metrics.height() > 0.0);
    }

    #[test]
    fn test_measure_grows_with_font_size() {
        let measurer = ParleyMeasurer::new();
        let small = measurer.measure("Hello", FontFamily::NotoSans, 32.0);
        let large = measurer.measure("Hello", FontFamily::NotoSans, 64.0);
        assert!(large.width > small.width);
        assert!(large.height() > small.height());
    }
}
