//! Timed select/deselect/delete feedback for text objects.
//!
//! Each object has at most one running task. Progress is computed from wall
//! clock time, so the effect takes the same time at any frame rate.

use crate::clock::elapsed_ms;
use crate::config::BoardConfig;
use crate::store::TextStore;
use crate::text::TextId;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::time::Duration;

/// Opacity of a selected object.
pub const SELECTED_OPACITY: f64 = 0.6;

/// Kind of feedback animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Select,
    Deselect,
    Delete,
}

#[derive(Debug, Clone)]
struct AnimationTask {
    kind: AnimationKind,
    started: Duration,
    duration_ms: f64,
    /// Object scale when the task started (deselect interpolates from it).
    start_scale: f64,
}

impl AnimationTask {
    fn progress(&self, now: Duration) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (elapsed_ms(self.started, now) / self.duration_ms).clamp(0.0, 1.0)
    }
}

/// Damped bounce used while selecting.
pub fn select_scale(p: f64) -> f64 {
    1.0 + (PI * p).sin() * (2.0 * PI * p).sin() * 0.03
}

/// Linear return to rest scale.
pub fn deselect_scale(start_scale: f64, p: f64) -> f64 {
    start_scale + (1.0 - start_scale) * p
}

/// Shrink while deleting.
pub fn delete_scale(p: f64) -> f64 {
    1.0 - 0.2 * p
}

/// Fade while deleting.
pub fn delete_opacity(p: f64) -> f64 {
    1.0 - p
}

/// Registry of running animations keyed by object.
#[derive(Debug, Clone)]
pub struct Animator {
    tasks: HashMap<TextId, AnimationTask>,
    select_ms: f64,
    deselect_ms: f64,
    delete_ms: f64,
}

impl Default for Animator {
    fn default() -> Self {
        Self::from_config(&BoardConfig::default())
    }
}

impl Animator {
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            tasks: HashMap::new(),
            select_ms: config.select_duration_ms,
            deselect_ms: config.deselect_duration_ms,
            delete_ms: config.delete_duration_ms,
        }
    }

    /// Start an animation on an object, replacing any running one.
    ///
    /// A running delete is never replaced: the request is ignored and false
    /// is returned. Requests for objects not in the store are ignored too.
    pub fn start(
        &mut self,
        id: TextId,
        kind: AnimationKind,
        now: Duration,
        store: &TextStore,
    ) -> bool {
        if self.is_deleting(id) {
            log::debug!("Ignoring {kind:?} on {id}: delete in progress");
            return false;
        }
        let Some(object) = store.get(id) else {
            return false;
        };

        let duration_ms = match kind {
            AnimationKind::Select => self.select_ms,
            AnimationKind::Deselect => self.deselect_ms,
            AnimationKind::Delete => self.delete_ms,
        };
        self.tasks.insert(
            id,
            AnimationTask {
                kind,
                started: now,
                duration_ms,
                start_scale: object.scale,
            },
        );
        log::trace!("Started {kind:?} animation on {id}");
        true
    }

    /// Advance every task to `now`.
    ///
    /// Finished deletes remove their object from the store; the removed ids
    /// are returned.
    pub fn tick(&mut self, now: Duration, store: &mut TextStore) -> Vec<TextId> {
        let mut finished = Vec::new();
        let mut deleted = Vec::new();

        for (&id, task) in &self.tasks {
            let Some(object) = store.get_mut(id) else {
                finished.push(id);
                continue;
            };
            let p = task.progress(now);

            match task.kind {
                AnimationKind::Select => {
                    object.scale = select_scale(p);
                    object.opacity = SELECTED_OPACITY;
                    if p >= 1.0 {
                        object.scale = 1.0;
                    }
                }
                AnimationKind::Deselect => {
                    object.scale = deselect_scale(task.start_scale, p);
                    if p >= 1.0 {
                        object.scale = 1.0;
                        object.opacity = 1.0;
                    }
                }
                AnimationKind::Delete => {
                    object.scale = delete_scale(p);
                    object.opacity = delete_opacity(p);
                    if p >= 1.0 {
                        deleted.push(id);
                    }
                }
            }

            if p >= 1.0 {
                finished.push(id);
            }
        }

        for id in &finished {
            self.tasks.remove(id);
        }
        for &id in &deleted {
            store.remove(id);
        }
        deleted
    }

    /// Kind of the task running on `id`, if any.
    pub fn running(&self, id: TextId) -> Option<AnimationKind> {
        self.tasks.get(&id).map(|task| task.kind)
    }

    pub fn is_deleting(&self, id: TextId) -> bool {
        self.running(id) == Some(AnimationKind::Delete)
    }

    /// Whether any task still needs frames.
    pub fn is_active(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Drop every task, leaving objects as they are.
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn store_with_one() -> (TextStore, TextId) {
        let mut store = TextStore::new();
        let id = store.insert("Hello", Point::ZERO, None).unwrap();
        (store, id)
    }

    #[test]
    fn test_select_curve_endpoints() {
        assert!((select_scale(0.0) - 1.0).abs() < 1e-12);
        assert!((select_scale(1.0) - 1.0).abs() < 1e-12);
        // Grows in the first half, dips in the second.
        assert!(select_scale(0.25) > 1.0);
        assert!(select_scale(0.75) < 1.0);
    }

    #[test]
    fn test_select_animation() {
        let (mut store, id) = store_with_one();
        let mut animator = Animator::default();
        assert!(animator.start(id, AnimationKind::Select, ms(0), &store));

        animator.tick(ms(50), &mut store);
        let object = store.get(id).unwrap();
        assert!((object.opacity - SELECTED_OPACITY).abs() < f64::EPSILON);
        assert!((object.scale - select_scale(0.25)).abs() < 1e-9);
        assert!(animator.is_active());

        animator.tick(ms(250), &mut store);
        let object = store.get(id).unwrap();
        assert!((object.scale - 1.0).abs() < f64::EPSILON);
        assert!((object.opacity - SELECTED_OPACITY).abs() < f64::EPSILON);
        assert!(!animator.is_active());
    }

    #[test]
    fn test_deselect_interpolates_from_current_scale() {
        let (mut store, id) = store_with_one();
        store.get_mut(id).unwrap().scale = 1.2;
        store.get_mut(id).unwrap().opacity = SELECTED_OPACITY;

        let mut animator = Animator::default();
        animator.start(id, AnimationKind::Deselect, ms(0), &store);
        animator.tick(ms(75), &mut store);
        assert!((store.get(id).unwrap().scale - 1.1).abs() < 1e-9);
        assert!((store.get(id).unwrap().opacity - SELECTED_OPACITY).abs() < f64::EPSILON);

        animator.tick(ms(150), &mut store);
        assert!((store.get(id).unwrap().scale - 1.0).abs() < f64::EPSILON);
        assert!((store.get(id).unwrap().opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_delete_removes_on_completion() {
        let (mut store, id) = store_with_one();
        let mut animator = Animator::default();
        animator.start(id, AnimationKind::Delete, ms(0), &store);

        assert!(animator.tick(ms(100), &mut store).is_empty());
        let object = store.get(id).unwrap();
        assert!((object.scale - 0.9).abs() < 1e-9);
        assert!((object.opacity - 0.5).abs() < 1e-9);

        let removed = animator.tick(ms(200), &mut store);
        assert_eq!(removed, vec![id]);
        assert!(!store.contains(id));
        assert!(!animator.is_active());
    }

    #[test]
    fn test_delete_cannot_be_superseded() {
        let (store, id) = store_with_one();
        let mut animator = Animator::default();
        assert!(animator.start(id, AnimationKind::Delete, ms(0), &store));
        assert!(!animator.start(id, AnimationKind::Select, ms(10), &store));
        assert!(!animator.start(id, AnimationKind::Delete, ms(10), &store));
        assert_eq!(animator.running(id), Some(AnimationKind::Delete));
    }

    #[test]
    fn test_new_animation_supersedes_previous() {
        let (mut store, id) = store_with_one();
        let mut animator = Animator::default();
        animator.start(id, AnimationKind::Select, ms(0), &store);
        animator.tick(ms(50), &mut store);
        animator.start(id, AnimationKind::Deselect, ms(50), &store);
        assert_eq!(animator.running(id), Some(AnimationKind::Deselect));

        animator.tick(ms(200), &mut store);
        let object = store.get(id).unwrap();
        assert!((object.scale - 1.0).abs() < f64::EPSILON);
        assert!((object.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_independent_objects() {
        let mut store = TextStore::new();
        let a = store.insert("A", Point::ZERO, None).unwrap();
        let b = store.insert("B", Point::ZERO, None).unwrap();
        let mut animator = Animator::default();
        animator.start(a, AnimationKind::Delete, ms(0), &store);
        animator.start(b, AnimationKind::Select, ms(100), &store);

        animator.tick(ms(200), &mut store);
        assert!(!store.contains(a));
        assert_eq!(animator.running(b), Some(AnimationKind::Select));
    }

    #[test]
    fn test_task_for_removed_object_is_dropped() {
        let (mut store, id) = store_with_one();
        let mut animator = Animator::default();
        animator.start(id, AnimationKind::Select, ms(0), &store);
        store.remove(id);
        animator.tick(ms(10), &mut store);
        assert!(!animator.is_active());
    }
}
