//! Inertial panning.
//!
//! While the pointer drags the canvas, the offset follows the pointer 1:1 and
//! the velocity is sampled per move. On release the velocity keeps moving the
//! offset and decays by a time-normalized friction factor every frame.

use crate::clock::elapsed_ms;
use crate::config::BoardConfig;
use kurbo::{Point, Vec2};
use std::time::Duration;

/// Phase of the pan motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionPhase {
    #[default]
    Idle,
    Dragging,
    Decelerating,
}

/// Velocity tracking and deceleration for pan drags.
#[derive(Debug, Clone)]
pub struct Inertia {
    /// Velocity in screen pixels per nominal frame.
    pub velocity: Vec2,
    phase: MotionPhase,
    last_position: Point,
    last_time: Duration,
    /// Whether the current drag moved at all.
    moved: bool,
    friction: f64,
    frame_interval_ms: f64,
    epsilon: f64,
}

impl Default for Inertia {
    fn default() -> Self {
        Self::from_config(&BoardConfig::default())
    }
}

impl Inertia {
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            velocity: Vec2::ZERO,
            phase: MotionPhase::Idle,
            last_position: Point::ZERO,
            last_time: Duration::ZERO,
            moved: false,
            friction: config.friction,
            frame_interval_ms: config.frame_interval_ms,
            epsilon: config.velocity_epsilon,
        }
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn is_decelerating(&self) -> bool {
        self.phase == MotionPhase::Decelerating
    }

    /// Start a drag. Cancels any running deceleration.
    pub fn begin(&mut self, position: Point, now: Duration) {
        if self.is_decelerating() {
            log::debug!("Deceleration cancelled by new drag");
        }
        self.velocity = Vec2::ZERO;
        self.phase = MotionPhase::Dragging;
        self.last_position = position;
        self.last_time = now;
        self.moved = false;
    }

    /// Track a pointer move and return the raw displacement to apply.
    pub fn drag_to(&mut self, position: Point, now: Duration) -> Vec2 {
        if self.phase != MotionPhase::Dragging {
            return Vec2::ZERO;
        }

        let delta = position - self.last_position;
        let elapsed = elapsed_ms(self.last_time, now);
        if delta != Vec2::ZERO {
            self.moved = true;
        }
        self.velocity = if elapsed > 0.0 {
            delta / elapsed * self.frame_interval_ms
        } else {
            delta
        };
        self.last_position = position;
        self.last_time = now;
        delta
    }

    /// End the drag. Returns true if deceleration started.
    pub fn release(&mut self, now: Duration) -> bool {
        if self.phase != MotionPhase::Dragging {
            return false;
        }
        self.last_time = now;
        if self.moved && self.is_above_epsilon() {
            self.phase = MotionPhase::Decelerating;
            log::debug!(
                "Decelerating from ({:.2}, {:.2})",
                self.velocity.x,
                self.velocity.y
            );
            true
        } else {
            self.stop();
            false
        }
    }

    /// Advance deceleration by one frame.
    ///
    /// Returns the offset delta for this frame, or `None` if no deceleration
    /// is running. The phase drops to idle once the velocity falls below the
    /// epsilon. A frame with no elapsed time moves nothing.
    pub fn step(&mut self, now: Duration) -> Option<Vec2> {
        if self.phase != MotionPhase::Decelerating {
            return None;
        }

        let dt = elapsed_ms(self.last_time, now);
        if dt <= 0.0 {
            return Some(Vec2::ZERO);
        }
        self.last_time = now;
        self.velocity *= self.friction.powf(dt / self.frame_interval_ms);
        let delta = self.velocity;

        if !self.is_above_epsilon() {
            self.phase = MotionPhase::Idle;
        }
        Some(delta)
    }

    /// Stop all motion.
    pub fn cancel(&mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.phase = MotionPhase::Idle;
        self.velocity = Vec2::ZERO;
        self.moved = false;
    }

    fn is_above_epsilon(&self) -> bool {
        self.velocity.x.abs() > self.epsilon || self.velocity.y.abs() > self.epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_velocity_is_frame_normalized() {
        let mut inertia = Inertia::default();
        inertia.begin(Point::new(0.0, 0.0), ms(0));

        // 20px in 33.34ms is 10px per nominal frame.
        let delta = inertia.drag_to(Point::new(20.0, 0.0), Duration::from_secs_f64(0.03334));
        assert_eq!(delta, Vec2::new(20.0, 0.0));
        assert!((inertia.velocity.x - 10.0).abs() < 1e-6);
        assert!(inertia.velocity.y.abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_elapsed_uses_raw_delta() {
        let mut inertia = Inertia::default();
        inertia.begin(Point::ZERO, ms(5));
        inertia.drag_to(Point::new(3.0, 4.0), ms(5));
        assert_eq!(inertia.velocity, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_release_without_movement_stays_idle() {
        let mut inertia = Inertia::default();
        inertia.begin(Point::new(10.0, 10.0), ms(0));
        inertia.drag_to(Point::new(10.0, 10.0), ms(16));
        assert!(!inertia.release(ms(20)));
        assert_eq!(inertia.phase(), MotionPhase::Idle);
        assert!(inertia.step(ms(36)).is_none());
    }

    #[test]
    fn test_deceleration_decays_to_idle() {
        let mut inertia = Inertia::default();
        inertia.begin(Point::ZERO, ms(0));
        inertia.drag_to(Point::new(30.0, -15.0), ms(16));
        assert!(inertia.release(ms(16)));

        let mut now = 16;
        let mut last_speed = inertia.velocity.hypot();
        let mut frames = 0;
        while inertia.is_decelerating() {
            now += 16;
            let delta = inertia.step(ms(now)).unwrap();
            let speed = delta.hypot();
            assert!(speed < last_speed);
            last_speed = speed;
            frames += 1;
            assert!(frames < 1000, "deceleration never settled");
        }

        assert!(inertia.velocity.x.abs() <= 0.01 && inertia.velocity.y.abs() <= 0.01);
        assert!(inertia.step(ms(now + 16)).is_none());
    }

    #[test]
    fn test_friction_is_time_normalized() {
        let mut one = Inertia::default();
        one.begin(Point::ZERO, ms(0));
        one.drag_to(Point::new(100.0, 0.0), ms(16));
        one.release(ms(16));
        let mut two = one.clone();

        // One long frame decays as much as two nominal frames.
        one.step(Duration::from_secs_f64(0.016 + 2.0 * 0.01667));
        two.step(Duration::from_secs_f64(0.016 + 0.01667));
        two.step(Duration::from_secs_f64(0.016 + 2.0 * 0.01667));
        assert!((one.velocity.x - two.velocity.x).abs() < 1e-6);
    }

    #[test]
    fn test_repeated_frame_time_does_not_move() {
        let mut inertia = Inertia::default();
        inertia.begin(Point::ZERO, ms(0));
        inertia.drag_to(Point::new(40.0, 0.0), ms(16));
        inertia.release(ms(16));

        let first = inertia.step(ms(32)).unwrap();
        assert!(first.x > 0.0);
        let velocity = inertia.velocity;

        assert_eq!(inertia.step(ms(32)), Some(Vec2::ZERO));
        assert_eq!(inertia.velocity, velocity);
        assert!(inertia.is_decelerating());

        let next = inertia.step(ms(48)).unwrap();
        assert!(next.x < first.x);
    }

    #[test]
    fn test_begin_cancels_deceleration() {
        let mut inertia = Inertia::default();
        inertia.begin(Point::ZERO, ms(0));
        inertia.drag_to(Point::new(50.0, 0.0), ms(16));
        inertia.release(ms(16));
        assert!(inertia.is_decelerating());

        inertia.begin(Point::new(5.0, 5.0), ms(40));
        assert_eq!(inertia.phase(), MotionPhase::Dragging);
        assert_eq!(inertia.velocity, Vec2::ZERO);
    }
}
