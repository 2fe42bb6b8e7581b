//! The board: one explicit context object owning all canvas state.

use crate::animation::{AnimationKind, Animator};
use crate::camera::Camera;
use crate::clock::{Clock, SystemClock};
use crate::config::BoardConfig;
use crate::interaction::InteractionState;
use crate::motion::Inertia;
use crate::store::TextStore;
use crate::text::{ApproximateMeasurer, TextId, TextMeasurer, TextObject};
use crate::tools::ToolKind;
use kurbo::{Point, Rect, Size};

/// Canvas state: viewport, text objects, selection, and running tasks.
///
/// Input goes through [`Board::handle_event`] (see the `interaction`
/// module); the host calls [`Board::tick`] once per frame while
/// [`Board::needs_frame`] is true.
pub struct Board {
    pub(crate) config: BoardConfig,
    /// Viewport transform.
    pub camera: Camera,
    pub(crate) store: TextStore,
    pub(crate) motion: Inertia,
    pub(crate) animator: Animator,
    pub(crate) state: InteractionState,
    pub(crate) tool: ToolKind,
    pub(crate) selected: Option<TextId>,
    pub(crate) hovered: Option<TextId>,
    pub(crate) hovering_handle: bool,
    /// Last pointer position seen, in screen coordinates.
    pub(crate) pointer: Option<Point>,
    pub(crate) grid_visible: bool,
    pub(crate) device_pixel_ratio: f64,
    clock: Box<dyn Clock>,
    measurer: Box<dyn TextMeasurer>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Board {
    /// Create a board with the system clock and approximate text metrics.
    pub fn new(config: BoardConfig) -> Self {
        Self::with_parts(config, Box::new(SystemClock::new()), Box::new(ApproximateMeasurer))
    }

    /// Create a board with an explicit clock and text measurer.
    pub fn with_parts(
        config: BoardConfig,
        clock: Box<dyn Clock>,
        measurer: Box<dyn TextMeasurer>,
    ) -> Self {
        log::info!(
            "Board initialized (scale {}..{}, grid {})",
            config.min_scale,
            config.max_scale,
            config.grid_size
        );
        Self {
            camera: Camera::from_config(&config),
            store: TextStore::with_font_bounds(
                config.min_font_size,
                config.max_font_size,
                config.default_font_size,
            ),
            motion: Inertia::from_config(&config),
            animator: Animator::from_config(&config),
            state: InteractionState::Idle,
            tool: ToolKind::default(),
            selected: None,
            hovered: None,
            hovering_handle: false,
            pointer: None,
            grid_visible: true,
            device_pixel_ratio: 1.0,
            config,
            clock,
            measurer,
        }
    }

    /// Replace the text measurer, e.g. once the renderer's fonts are loaded.
    pub fn set_measurer(&mut self, measurer: Box<dyn TextMeasurer>) {
        self.measurer = measurer;
    }

    /// Stop all tasks and drop all content.
    pub fn teardown(&mut self) {
        self.motion.cancel();
        self.animator.cancel_all();
        self.store.clear();
        self.selected = None;
        self.hovered = None;
        self.hovering_handle = false;
        self.state = InteractionState::Idle;
        log::info!("Board torn down");
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn store(&self) -> &TextStore {
        &self.store
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    pub fn now(&self) -> std::time::Duration {
        self.clock.now()
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn motion(&self) -> &Inertia {
        &self.motion
    }

    pub fn selected(&self) -> Option<TextId> {
        self.selected
    }

    pub fn selected_object(&self) -> Option<&TextObject> {
        self.selected.and_then(|id| self.store.get(id))
    }

    pub fn is_selected(&self, id: TextId) -> bool {
        self.selected == Some(id)
    }

    /// Whether a delete animation is running on `id`.
    pub fn is_deleting(&self, id: TextId) -> bool {
        self.animator.is_deleting(id)
    }

    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Window resize notification.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.camera.set_viewport_size(size);
    }

    /// Unpadded text box of an object in virtual coordinates.
    pub fn text_bounds(&self, id: TextId) -> Option<Rect> {
        self.store.get(id).map(|object| object.bounds(self.measurer()))
    }

    /// Padded hit box of an object in virtual coordinates.
    pub fn hit_bounds(&self, id: TextId) -> Option<Rect> {
        let padding = self.config.hit_padding;
        self.text_bounds(id).map(|bounds| bounds.inflate(padding, padding))
    }

    /// Screen position of the font-resize handle of the selected object.
    pub fn resize_handle(&self) -> Option<Point> {
        let id = self.selected?;
        if self.animator.is_deleting(id) {
            return None;
        }
        let bounds = self.hit_bounds(id)?;
        Some(self.camera.virtual_to_screen(Point::new(bounds.x1, bounds.y1)))
    }

    /// Whether a screen point is on the selected object's resize handle.
    pub(crate) fn hit_resize_handle(&self, screen_point: Point) -> bool {
        self.resize_handle().is_some_and(|handle| {
            handle.distance(screen_point) <= self.config.resize_handle_radius
        })
    }

    /// Topmost text hit at a virtual point, skipping objects being deleted.
    pub(crate) fn hit_test(&self, virtual_point: Point) -> Option<TextId> {
        self.store.hit_test_filtered(
            virtual_point,
            self.measurer(),
            self.config.hit_padding,
            |id| !self.animator.is_deleting(id),
        )
    }

    /// Select an object and start its select animation.
    pub(crate) fn select(&mut self, id: TextId) {
        let now = self.clock.now();
        self.selected = Some(id);
        self.animator.start(id, AnimationKind::Select, now, &self.store);
        log::debug!("Selected text {id}");
    }

    /// Clear the selection, animating the previously selected object back.
    pub(crate) fn deselect(&mut self) -> bool {
        let Some(id) = self.selected.take() else {
            return false;
        };
        let now = self.clock.now();
        self.animator.start(id, AnimationKind::Deselect, now, &self.store);
        log::debug!("Deselected text {id}");
        true
    }

    /// Start the delete animation on the selected object.
    ///
    /// Returns false if nothing is selected or the object is already being
    /// deleted.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        if self.animator.is_deleting(id) {
            return false;
        }
        let now = self.clock.now();
        let started = self.animator.start(id, AnimationKind::Delete, now, &self.store);
        if started {
            log::debug!("Deleting text {id}");
        }
        started
    }

    /// Advance deceleration and animations to the current time.
    ///
    /// Returns true if anything changed and the scene should be redrawn.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        let mut redraw = false;

        if let Some(delta) = self.motion.step(now) {
            self.camera.pan(delta);
            redraw = true;
        }

        if self.animator.is_active() {
            redraw = true;
            for id in self.animator.tick(now, &mut self.store) {
                self.forget(id);
            }
        }

        redraw
    }

    /// Whether a timed task still needs frames.
    pub fn needs_frame(&self) -> bool {
        self.motion.is_decelerating() || self.animator.is_active()
    }

    /// Drop every reference to a removed object.
    fn forget(&mut self, id: TextId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.state.target() == Some(id) {
            self.state = InteractionState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn board() -> (Board, ManualClock) {
        let clock = ManualClock::new();
        let mut board = Board::with_parts(
            BoardConfig::default(),
            Box::new(clock.clone()),
            Box::new(ApproximateMeasurer),
        );
        board.set_viewport_size(Size::new(800.0, 600.0));
        (board, clock)
    }

    #[test]
    fn test_new_board_is_idle() {
        let (board, _) = board();
        assert!(board.store().is_empty());
        assert!(board.selected().is_none());
        assert_eq!(board.tool(), ToolKind::Pan);
        assert!(board.grid_visible());
        assert!(!board.needs_frame());
    }

    #[test]
    fn test_delete_selected_lifecycle() {
        let (mut board, clock) = board();
        let id = board.store.insert("Bye", Point::ZERO, None).unwrap();
        board.select(id);

        assert!(board.delete_selected());
        assert!(!board.delete_selected());
        assert!(board.needs_frame());

        clock.advance_ms(100.0);
        assert!(board.tick());
        assert!(board.store().contains(id));
        assert_eq!(board.selected(), Some(id));

        clock.advance_ms(120.0);
        board.tick();
        assert!(!board.store().contains(id));
        assert!(board.selected().is_none());
        assert!(!board.needs_frame());
    }

    #[test]
    fn test_delete_without_selection() {
        let (mut board, _) = board();
        board.store.insert("Stay", Point::ZERO, None);
        assert!(!board.delete_selected());
        assert_eq!(board.store().len(), 1);
    }

    #[test]
    fn test_resize_handle_at_padded_corner() {
        let (mut board, _) = board();
        let id = board.store.insert("Hi", Point::new(100.0, 100.0), None).unwrap();
        assert!(board.resize_handle().is_none());
        board.select(id);

        let bounds = board.hit_bounds(id).unwrap();
        let handle = board.resize_handle().unwrap();
        assert!((handle.x - bounds.x1).abs() < 1e-9);
        assert!((handle.y - bounds.y1).abs() < 1e-9);
        assert!(board.hit_resize_handle(Point::new(handle.x + 5.0, handle.y)));
        assert!(!board.hit_resize_handle(Point::new(handle.x + 20.0, handle.y)));
    }

    #[test]
    fn test_teardown_clears_everything() {
        let (mut board, _) = board();
        let id = board.store.insert("Hi", Point::ZERO, None).unwrap();
        board.select(id);
        board.teardown();
        assert!(board.store().is_empty());
        assert!(board.selected().is_none());
        assert!(!board.needs_frame());
    }
}
