//! Ordered collection of text objects.

use crate::text::{FontFamily, TextId, TextMeasurer, TextObject};
use kurbo::Point;

/// Owns every text object on the board.
///
/// Objects are kept in insertion order, which is also draw order.
#[derive(Debug, Clone)]
pub struct TextStore {
    objects: Vec<TextObject>,
    min_font_size: f64,
    max_font_size: f64,
    default_font_size: f64,
}

impl Default for TextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TextStore {
    /// Create a store with the default font bounds.
    pub fn new() -> Self {
        Self::with_font_bounds(32.0, 512.0, TextObject::DEFAULT_FONT_SIZE)
    }

    /// Create a store with custom font size bounds.
    pub fn with_font_bounds(min: f64, max: f64, default_size: f64) -> Self {
        Self {
            objects: Vec::new(),
            min_font_size: min,
            max_font_size: max,
            default_font_size: default_size.clamp(min, max),
        }
    }

    /// Append a new text object.
    ///
    /// Returns `None` without touching the store if the text is blank.
    pub fn insert(
        &mut self,
        text: &str,
        position: Point,
        font_family: Option<FontFamily>,
    ) -> Option<TextId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let object = TextObject::new(text, position)
            .with_font_family(font_family.unwrap_or_default())
            .with_font_size(self.default_font_size);
        let id = object.id();
        log::debug!("Inserted text {id} at ({:.1}, {:.1})", position.x, position.y);
        self.objects.push(object);
        Some(id)
    }

    /// First object (in store order) whose padded box contains `point`.
    pub fn hit_test(
        &self,
        point: Point,
        measurer: &dyn TextMeasurer,
        padding: f64,
    ) -> Option<TextId> {
        self.hit_test_filtered(point, measurer, padding, |_| true)
    }

    /// Like [`hit_test`](Self::hit_test), skipping objects rejected by `filter`.
    pub fn hit_test_filtered(
        &self,
        point: Point,
        measurer: &dyn TextMeasurer,
        padding: f64,
        filter: impl Fn(TextId) -> bool,
    ) -> Option<TextId> {
        self.objects
            .iter()
            .filter(|object| filter(object.id))
            .find(|object| object.hit_test(point, measurer, padding))
            .map(TextObject::id)
    }

    /// Remove an object by identity.
    pub fn remove(&mut self, id: TextId) -> Option<TextObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        log::debug!("Removed text {id}");
        Some(self.objects.remove(index))
    }

    /// Move an object. Returns false if it no longer exists.
    pub fn update_position(&mut self, id: TextId, position: Point) -> bool {
        match self.get_mut(id) {
            Some(object) => {
                object.position = position;
                true
            }
            None => false,
        }
    }

    /// Change an object's font size, clamped to the bounds.
    pub fn update_font_size(&mut self, id: TextId, size: f64) -> bool {
        let size = self.clamp_font_size(size);
        match self.get_mut(id) {
            Some(object) => {
                object.font_size = size;
                true
            }
            None => false,
        }
    }

    pub fn clamp_font_size(&self, size: f64) -> f64 {
        size.clamp(self.min_font_size, self.max_font_size)
    }

    pub fn get(&self, id: TextId) -> Option<&TextObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn get_mut(&mut self, id: TextId) -> Option<&mut TextObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    pub fn contains(&self, id: TextId) -> bool {
        self.get(id).is_some()
    }

    /// Objects in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &TextObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
