//! Thermal interlock supervisor.
//!
//! Evaluated at the top of every poll, before any other pump logic, and
//! on every activation attempt.  The interlock is tripped when it is
//! enabled and the last pushed temperature is at or above the configured
//! maximum.  An unknown temperature (nothing pushed yet) never trips it.
//!
//! The supervisor keeps a latched flag purely so that trips and clears
//! are logged once per edge rather than on every tick.

use crate::config::InterlockConfig;
use log::{info, warn};

/// Pure trip condition, shared by the poll path and toggle.
pub fn over_temperature(config: &InterlockConfig, temperature_c: Option<f32>) -> bool {
    config.enabled && temperature_c.is_some_and(|t| t >= config.max_temperature_c)
}

/// Edge-logging wrapper around [`over_temperature`].
#[derive(Debug, Default)]
pub struct ThermalInterlock {
    tripped: bool,
}

impl ThermalInterlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluate against the latest reading.  Returns whether the pump must be held off.
    pub fn evaluate(&mut self, config: &InterlockConfig, temperature_c: Option<f32>) -> bool {
        let tripped = over_temperature(config, temperature_c);
        if tripped && !self.tripped {
            warn!(
                "SAFETY FAULT SET: pump over temperature ({:.1}\u{00b0}C >= {:.1}\u{00b0}C)",
                temperature_c.unwrap_or_default(),
                config.max_temperature_c
            );
        } else if !tripped && self.tripped {
            info!("SAFETY FAULT CLEARED: pump temperature back under limit");
        }
        self.tripped = tripped;
        tripped
    }

    /// Result of the most recent [`evaluate`](Self::evaluate).
    pub fn is_tripped(&self) -> bool {
        self.tripped
    }
}
