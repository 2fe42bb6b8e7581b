//! Text objects and text measurement.

use kurbo::{Point, Rect};
use std::fmt;
use uuid::Uuid;

/// Identity of a text object. Two objects with the same text are still
/// distinct objects.
pub type TextId = Uuid;

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    /// IranSans, the default.
    #[default]
    IranSans,
    /// Vazirmatn.
    Vazirmatn,
    /// Noto Sans clean sans-serif font.
    NotoSans,
}

impl FontFamily {
    /// Identifier used by the text-entry surface and in configs.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::IranSans => "IranSans",
            FontFamily::Vazirmatn => "Vazirmatn",
            FontFamily::NotoSans => "NotoSans",
        }
    }

    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            FontFamily::IranSans => "IranSans",
            FontFamily::Vazirmatn => "Vazirmatn",
            FontFamily::NotoSans => "Noto Sans",
        }
    }

    /// CSS-style font stack. Measurement and rendering both resolve fonts
    /// through this, so hit boxes match what is drawn.
    pub fn font_stack(&self) -> &'static str {
        match self {
            FontFamily::IranSans => "IRANSans, IranSans, Vazirmatn, sans-serif",
            FontFamily::Vazirmatn => "Vazirmatn, Vazir, sans-serif",
            FontFamily::NotoSans => "Noto Sans, sans-serif",
        }
    }

    /// Get all available font families.
    pub fn all() -> &'static [FontFamily] {
        &[FontFamily::IranSans, FontFamily::Vazirmatn, FontFamily::NotoSans]
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Measured extent of a single line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Advance width.
    pub width: f64,
    /// Distance from the baseline up to the top of the line box.
    pub ascent: f64,
    /// Distance from the baseline down to the bottom of the line box.
    pub descent: f64,
}

impl TextMetrics {
    /// Total line height.
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }

    /// Box of text centered on `position`.
    pub fn bounds_at(&self, position: Point) -> Rect {
        let half_w = self.width / 2.0;
        let half_h = self.height() / 2.0;
        Rect::new(
            position.x - half_w,
            position.y - half_h,
            position.x + half_w,
            position.y + half_h,
        )
    }

    /// Baseline y for text centered on `position`.
    pub fn baseline_at(&self, position: Point) -> f64 {
        position.y - self.height() / 2.0 + self.ascent
    }
}

/// Measures text the way the renderer lays it out.
pub trait TextMeasurer {
    /// Measure `text` set in `family` at `font_size`.
    fn measure(&self, text: &str, family: FontFamily, font_size: f64) -> TextMetrics;
}

/// Font-free measurer using average glyph widths.
///
/// Used by tests and hosts without a font stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasurer;

impl ApproximateMeasurer {
    /// Ascent as a fraction of the font size.
    pub const ASCENT: f64 = 0.8;
    /// Descent as a fraction of the font size.
    pub const DESCENT: f64 = 0.2;

    /// Average glyph width as a fraction of the font size.
    pub fn char_width_factor(family: FontFamily) -> f64 {
        match family {
            FontFamily::IranSans => 0.55,
            FontFamily::Vazirmatn => 0.52,
            FontFamily::NotoSans => 0.5,
        }
    }
}

impl TextMeasurer for ApproximateMeasurer {
    fn measure(&self, text: &str, family: FontFamily, font_size: f64) -> TextMetrics {
        let chars = text.chars().count() as f64;
        TextMetrics {
            width: chars * font_size * Self::char_width_factor(family),
            ascent: font_size * Self::ASCENT,
            descent: font_size * Self::DESCENT,
        }
    }
}

/// A text object placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct TextObject {
    pub(crate) id: TextId,
    /// The text content.
    pub text: String,
    /// Center of the text box in virtual coordinates.
    pub position: Point,
    /// Font family.
    pub font_family: FontFamily,
    /// Font size in virtual units.
    pub font_size: f64,
    /// Animation scale multiplier.
    pub scale: f64,
    /// Animation alpha.
    pub opacity: f64,
}

impl TextObject {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 48.0;

    /// Create a new text object with default font, size, and animation state.
    pub fn new(text: impl Into<String>, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            position,
            font_family: FontFamily::default(),
            font_size: Self::DEFAULT_FONT_SIZE,
            scale: 1.0,
            opacity: 1.0,
        }
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn id(&self) -> TextId {
        self.id
    }

    /// Measure this object with its own font configuration.
    pub fn metrics(&self, measurer: &dyn TextMeasurer) -> TextMetrics {
        measurer.measure(&self.text, self.font_family, self.font_size)
    }

    /// Text box in virtual coordinates, without padding.
    pub fn bounds(&self, measurer: &dyn TextMeasurer) -> Rect {
        self.metrics(measurer).bounds_at(self.position)
    }

    /// Whether `point` lies inside the text box inflated by `padding`.
    pub fn hit_test(&self, point: Point, measurer: &dyn TextMeasurer, padding: f64) -> bool {
        self.bounds(measurer).inflate(padding, padding).contains(point)
    }
}
