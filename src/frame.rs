//! Frame timing.
//!
//! The engine does not own a display link. The host calls [`GraphEngine::tick`] once per frame
//! with a timestamp from any [`Clock`]; [`ManualClock`] makes that deterministic.
//!
//! [`GraphEngine::tick`]: crate::engine::GraphEngine::tick

use std::cell::Cell;
use std::time::Instant;

/// Millisecond time source.
pub trait Clock {
    /// Current time in milliseconds from an arbitrary origin.
    fn now_ms(&self) -> f64;
}

/// Monotonic wall clock starting at zero.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock whose zero is now.
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    /// Clock reading `start_ms`.
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move forward by `ms` and return the new reading.
    pub fn advance(&self, ms: f64) -> f64 {
        let next = self.now.get() + ms.max(0.0);
        self.now.set(next);
        next
    }

    /// Jump to `ms`; never goes backwards.
    pub fn set(&self, ms: f64) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Index and timing of one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct FrameInfo {
    /// Zero-based frame number.
    pub index: u64,
    /// Timestamp of this frame.
    pub now_ms: f64,
    /// Time since the previous frame; zero for the first one.
    pub delta_ms: f64,
}

impl FrameInfo {
    /// First frame at `now_ms`.
    pub fn first(now_ms: f64) -> Self {
        Self {
            index: 0,
            now_ms,
            delta_ms: 0.0,
        }
    }

    /// Frame following `self` at `now_ms`; time never runs backwards.
    pub fn next(self, now_ms: f64) -> Self {
        let now_ms = now_ms.max(self.now_ms);
        Self {
            index: self.index + 1,
            now_ms,
            delta_ms: now_ms - self.now_ms,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/frame.rs"]
mod tests;
