//! Wall-clock sources for the frame scheduler

use cadence_core::Seconds;
use instant::Instant;
use std::cell::Cell;
use std::rc::Rc;

/// Supplies monotonic wall-clock time.
pub trait ClockSource {
    /// Seconds since an arbitrary, fixed epoch.
    fn now(&self) -> Seconds;
}

/// Clock backed by the platform's monotonic timer
#[derive(Debug, Clone)]
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

impl ClockSource for SystemClock {
    fn now(&self) -> Seconds {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same reading, so a test or an externally paced host can
/// keep a handle and advance the clock while the scheduler owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Seconds>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&self, seconds: Seconds) {
        self.now.set(self.now.get() + seconds);
    }

    /// Jump to an absolute reading.
    pub fn set(&self, seconds: Seconds) {
        self.now.set(seconds);
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> Seconds {
        self.now.get()
    }
}
