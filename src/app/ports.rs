//! Port traits: the boundary between the pump engine and the platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PumpController (domain)
//! ```
//!
//! Pins and blocking delays come straight from `embedded-hal` 1.0
//! (`StatefulOutputPin`, `InputPin`, `DelayNs`).  The two concerns
//! `embedded-hal` does not cover live here: reading time, and being told
//! that the relay changed.

use crate::fsm::OutputState;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: platform timer → domain)
// ───────────────────────────────────────────────────────────────

/// Time source for interval arithmetic.
///
/// Both readings must be monotonically non-decreasing.  Only differences
/// are ever used, so the epoch is irrelevant.
pub trait Clock {
    /// Whole seconds; drives ventilation and grain-rest timing.
    fn now_secs(&self) -> u64;

    /// Milliseconds; drives the phase-sync edge deadline.
    fn millis(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_secs(&self) -> u64 {
        (**self).now_secs()
    }

    fn millis(&self) -> u64 {
        (**self).millis()
    }
}

// ───────────────────────────────────────────────────────────────
// Output listener port (driven adapter: domain → display / telemetry)
// ───────────────────────────────────────────────────────────────

/// Notified synchronously after every confirmed relay change, once the
/// settle delay has elapsed.  Typical use is refreshing a display.
pub trait OutputListener {
    fn on_output_changed(&mut self, state: OutputState);
}

impl<F: FnMut(OutputState)> OutputListener for F {
    fn on_output_changed(&mut self, state: OutputState) {
        self(state);
    }
}
