//! Grain rest scheduler.
//!
//! Tracks two timestamps (seconds):
//!
//! - `period_start`: when the next rest becomes due.
//! - `window_end`: when the rest in progress ends.
//!
//! Entry into a rest is driven from outside the polling loop (the heating
//! controller decides, taking the near-setpoint inhibit into account);
//! this type only keeps the arithmetic in one place.

use crate::config::GrainRestConfig;

const SECS_PER_MIN: u64 = 60;

#[derive(Debug, Clone, Default)]
pub struct GrainRestScheduler {
    period_start: u64,
    window_end: u64,
}

impl GrainRestScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next rest one full period from `now`; no rest in progress.
    pub fn reset(&mut self, now: u64, config: &GrainRestConfig) {
        self.period_start = now + u64::from(config.period_mins) * SECS_PER_MIN;
        self.window_end = now;
    }

    /// Open a rest window at `now` and push the next period past its end.
    pub fn begin(&mut self, now: u64, config: &GrainRestConfig) {
        self.window_end = now + u64::from(config.length_mins) * SECS_PER_MIN;
        self.period_start = self.window_end + u64::from(config.period_mins) * SECS_PER_MIN;
    }

    /// A full period has passed since the last reset or rest.
    pub fn is_due(&self, now: u64) -> bool {
        now >= self.period_start
    }

    /// The rest window in progress has ended.
    pub fn window_elapsed(&self, now: u64) -> bool {
        now >= self.window_end
    }

    pub fn period_start(&self) -> u64 {
        self.period_start
    }

    pub fn window_end(&self) -> u64 {
        self.window_end
    }
}
