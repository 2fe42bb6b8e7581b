//! Time sources for frame-driven tasks.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// A monotonic time source.
///
/// Timestamps are durations since an arbitrary epoch fixed by the clock.
pub trait Clock {
    /// Current time.
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Manually advanced clock.
///
/// Clones share the same time, so a test can keep one handle and hand
/// another to the board.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Move time forward by a number of milliseconds.
    pub fn advance_ms(&self, ms: f64) {
        self.advance(Duration::from_secs_f64(ms / 1000.0));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Milliseconds between two timestamps, zero if `later` is earlier.
pub(crate) fn elapsed_ms(earlier: Duration, later: Duration) -> f64 {
    later.saturating_sub(earlier).as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(16));
        handle.advance_ms(4.0);
        assert!((clock.now().as_secs_f64() * 1000.0 - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_elapsed_ms_saturates() {
        let a = Duration::from_millis(10);
        let b = Duration::from_millis(25);
        assert!((elapsed_ms(a, b) - 15.0).abs() < 1e-9);
        assert!(elapsed_ms(b, a).abs() < f64::EPSILON);
    }
}
