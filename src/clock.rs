//! Millisecond time sources for wall-clock driven morphs.

use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// A clock whose time is pushed in from outside.
///
/// The browser host sets it from the `requestAnimationFrame` timestamp before
/// each update; tests advance it by hand. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: f64) {
        if now_ms.is_finite() {
            self.now.set(now_ms);
        }
    }

    pub fn advance(&self, delta_ms: f64) {
        self.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Monotonic clock for native hosts. `Instant` is unavailable in the browser.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};

    #[test]
    fn clones_share_time() {
        let clock = ManualClock::new(10.0);
        let handle = clock.clone();
        handle.advance(6.5);
        assert_eq!(clock.now_ms(), 16.5);
    }

    #[test]
    fn ignores_non_finite_timestamps() {
        let clock = ManualClock::new(3.0);
        clock.set(f64::NAN);
        clock.set(f64::INFINITY);
        assert_eq!(clock.now_ms(), 3.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn system_clock_does_not_run_backwards() {
        let clock = super::SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
