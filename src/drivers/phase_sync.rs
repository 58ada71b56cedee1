//! Zero-crossing ("phase sync") gate for relay switching.
//!
//! An AC zero-cross detector feeds a digital input.  Before the relay is
//! switched, the gate waits for the input to go inactive, then for the
//! next rising edge, then applies the configured pre-activation delay,
//! so the contacts move near a voltage zero.
//!
//! ## Best effort
//!
//! Each wait is bounded by [`EDGE_TIMEOUT_MS`] measured from the start of
//! that wait.  A stalled, missing or unreadable sync signal degrades to
//! "switch after the timeout" and never blocks indefinitely.  Between
//! samples the loop yields through `DelayNs` instead of spinning.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};
use log::{debug, warn};

use crate::app::ports::Clock;
use crate::config::PhaseSyncConfig;

/// Upper bound on each level wait (milliseconds).
pub const EDGE_TIMEOUT_MS: u64 = 20;

/// Pause between input samples (microseconds).
const POLL_INTERVAL_US: u32 = 50;

/// Outcome of one gate pass, mostly for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Gate disabled or no sync line fitted.
    Bypassed,
    /// Rising edge observed.
    Synced,
    /// At least one wait timed out; switching anyway.
    TimedOut,
}

pub struct PhaseSync<I> {
    input: Option<I>,
}

impl<I: InputPin> PhaseSync<I> {
    pub fn new(input: Option<I>) -> Self {
        Self { input }
    }

    pub fn is_fitted(&self) -> bool {
        self.input.is_some()
    }

    /// Block until the next rising edge (bounded), then the pre-activation delay.
    pub fn wait(
        &mut self,
        config: &PhaseSyncConfig,
        clock: &impl Clock,
        delay: &mut impl DelayNs,
    ) -> SyncOutcome {
        if !config.enabled {
            return SyncOutcome::Bypassed;
        }
        let Some(input) = self.input.as_mut() else {
            return SyncOutcome::Bypassed;
        };

        let mut timed_out = false;

        // Already in the active half-cycle: wait it out first.
        if read_level(input) == Some(true) {
            timed_out |= !wait_for_level(input, false, EDGE_TIMEOUT_MS, clock, delay);
        }
        timed_out |= !wait_for_level(input, true, EDGE_TIMEOUT_MS, clock, delay);

        delay.delay_ms(config.pre_activation_delay_ms);

        if timed_out {
            warn!("phase sync: no zero-cross edge within {}ms, switching anyway", EDGE_TIMEOUT_MS);
            SyncOutcome::TimedOut
        } else {
            SyncOutcome::Synced
        }
    }
}

/// Poll `input` until it reads `high`, giving up once more than
/// `timeout_ms` has passed.  Returns whether the level was seen.
pub fn wait_for_level<I: InputPin>(
    input: &mut I,
    high: bool,
    timeout_ms: u64,
    clock: &impl Clock,
    delay: &mut impl DelayNs,
) -> bool {
    let start = clock.millis();
    loop {
        match read_level(input) {
            Some(level) if level == high => return true,
            Some(_) => {}
            // An unreadable input will not start working mid-wait.
            None => return false,
        }
        if clock.millis().saturating_sub(start) > timeout_ms {
            return false;
        }
        delay.delay_us(POLL_INTERVAL_US);
    }
}

fn read_level<I: InputPin>(input: &mut I) -> Option<bool> {
    match input.is_high() {
        Ok(level) => Some(level),
        Err(e) => {
            use embedded_hal::digital::Error as _;
            debug!("phase sync: input read failed ({:?})", e.kind());
            None
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Placeholder input for rigs without a zero-cross detector
// ───────────────────────────────────────────────────────────────

/// Stand-in sync input type for controllers built without a sync line.
/// Never constructed by the controller; it only fills the type parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSyncInput;

impl ErrorType for NoSyncInput {
    type Error = core::convert::Infallible;
}

impl InputPin for NoSyncInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}
