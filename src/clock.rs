use std::time::Duration;

pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Elapsed-time counter advanced by a fixed-interval tick.
///
/// The clock does not read wall time: every `tick()` adds exactly one
/// interval, so elapsed time is always a whole number of ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    elapsed: Duration,
    interval: Duration,
    paused: bool,
}

impl Clock {
    pub fn new(interval: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            interval,
            paused: true,
        }
    }

    /// Advance by one interval unless paused. Returns whether time moved.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.elapsed += self.interval;
        true
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}
