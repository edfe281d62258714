//! Fixed-cadence tick source
//!
//! Converts variable frame deltas from the window's redraw loop into whole
//! animation ticks spaced `interval` apart.

use std::time::Duration;

/// Most ticks released by a single `advance`; a longer stall drops the backlog
pub const MAX_CATCH_UP: u32 = 4;

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Duration,
    pending: Duration,
}

impl FrameScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Discard accumulated time so the next tick is a full interval away
    pub fn reset(&mut self) {
        self.pending = Duration::ZERO;
    }

    /// Add `elapsed` wall-clock time and return how many ticks are now due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.interval.is_zero() {
            return 1;
        }

        self.pending += elapsed;
        let mut due = 0;
        while self.pending >= self.interval {
            self.pending -= self.interval;
            due += 1;
        }

        if due > MAX_CATCH_UP {
            log::debug!("scheduler dropped {} late ticks", due - MAX_CATCH_UP);
            due = MAX_CATCH_UP;
        }
        due
    }

    /// Time left before the next tick becomes due
    pub fn time_until_next(&self) -> Duration {
        self.interval.saturating_sub(self.pending)
    }
}
