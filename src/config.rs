//! Pump configuration parameters
//!
//! All tunable parameters for one pump instance.  Defaults match the
//! stock brewing rig; the `*_MIN`/`*_MAX` bounds are the ranges offered
//! by configuration menus and enforced by [`PumpConfig::validate`].
//! Fields stay publicly writable through
//! [`PumpController::config_mut`](crate::app::controller::PumpController::config_mut);
//! the engine tolerates out-of-range values written that way.

use serde::{Deserialize, Serialize};

use crate::drivers::relay::Polarity;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Menu bounds
// ---------------------------------------------------------------------------

pub const VENT_CYCLES_MIN: u8 = 1;
pub const VENT_CYCLES_MAX: u8 = 5;

/// Bounds for a single ventilation ON or OFF interval, in seconds.
pub const VENT_TIME_MIN_SECS: u32 = 1;
pub const VENT_TIME_MAX_SECS: u32 = 10;

pub const GRAIN_REST_LENGTH_MIN_MINS: u32 = 1;
pub const GRAIN_REST_LENGTH_MAX_MINS: u32 = 10;

pub const GRAIN_REST_PERIOD_MIN_MINS: u32 = 1;
pub const GRAIN_REST_PERIOD_MAX_MINS: u32 = 20;

pub const PHASE_SYNC_PRE_DELAY_MIN_MS: u32 = 0;
pub const PHASE_SYNC_PRE_DELAY_MAX_MS: u32 = 9;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Startup air-purge sequence run on every activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VentilationConfig {
    pub enabled: bool,
    /// Number of ON/OFF cycles.
    pub cycles: u8,
    /// Length of each ON interval (seconds).
    pub on_secs: u32,
    /// Length of each OFF interval (seconds).
    pub off_secs: u32,
}

/// Periodic pump pause while mashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrainRestConfig {
    pub enabled: bool,
    /// How long the pump stays off during a rest (minutes).  Zero disables rests.
    pub length_mins: u32,
    /// Interval between rests (minutes).
    pub period_mins: u32,
    /// Initial value of the near-setpoint inhibit flag read by the heating loop.
    pub inhibit_near_setpoint: bool,
}

/// Over-temperature cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterlockConfig {
    pub enabled: bool,
    /// Pump is forced off at or above this temperature (Celsius).
    pub max_temperature_c: f32,
}

/// Zero-crossing alignment of relay switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSyncConfig {
    pub enabled: bool,
    /// Delay between the detected rising edge and the relay write (milliseconds).
    pub pre_activation_delay_ms: u32,
}

/// Complete pump configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PumpConfig {
    /// Mapping of logical ON/OFF onto output pin levels.
    pub polarity: Polarity,
    /// Blocking settle time after every relay change (milliseconds).
    pub relay_settle_ms: u32,
    pub ventilation: VentilationConfig,
    pub grain_rest: GrainRestConfig,
    pub interlock: InterlockConfig,
    pub phase_sync: PhaseSyncConfig,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            polarity: Polarity::ActiveHigh,
            relay_settle_ms: 200,
            ventilation: VentilationConfig {
                enabled: true,
                cycles: 3,
                on_secs: 5,
                off_secs: 2,
            },
            grain_rest: GrainRestConfig {
                enabled: true,
                length_mins: 1,
                period_mins: 5,
                inhibit_near_setpoint: true,
            },
            interlock: InterlockConfig {
                enabled: true,
                max_temperature_c: 93.0,
            },
            phase_sync: PhaseSyncConfig {
                enabled: false,
                pre_activation_delay_ms: 0,
            },
        }
    }
}

impl PumpConfig {
    /// Range-check every menu-bounded field.
    ///
    /// Out-of-range values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.ventilation;
        if !(VENT_CYCLES_MIN..=VENT_CYCLES_MAX).contains(&v.cycles) {
            return Err(ConfigError::ValidationFailed("ventilation.cycles must be 1-5"));
        }
        if !(VENT_TIME_MIN_SECS..=VENT_TIME_MAX_SECS).contains(&v.on_secs) {
            return Err(ConfigError::ValidationFailed("ventilation.on_secs must be 1-10"));
        }
        if !(VENT_TIME_MIN_SECS..=VENT_TIME_MAX_SECS).contains(&v.off_secs) {
            return Err(ConfigError::ValidationFailed("ventilation.off_secs must be 1-10"));
        }

        let g = &self.grain_rest;
        if !(GRAIN_REST_LENGTH_MIN_MINS..=GRAIN_REST_LENGTH_MAX_MINS).contains(&g.length_mins) {
            return Err(ConfigError::ValidationFailed("grain_rest.length_mins must be 1-10"));
        }
        if !(GRAIN_REST_PERIOD_MIN_MINS..=GRAIN_REST_PERIOD_MAX_MINS).contains(&g.period_mins) {
            return Err(ConfigError::ValidationFailed("grain_rest.period_mins must be 1-20"));
        }

        let t = self.interlock.max_temperature_c;
        if !t.is_finite() || t <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "interlock.max_temperature_c must be finite and positive",
            ));
        }

        if !(PHASE_SYNC_PRE_DELAY_MIN_MS..=PHASE_SYNC_PRE_DELAY_MAX_MS)
            .contains(&self.phase_sync.pre_activation_delay_ms)
        {
            return Err(ConfigError::ValidationFailed(
                "phase_sync.pre_activation_delay_ms must be 0-9",
            ));
        }

        Ok(())
    }

    /// Serialize to a compact postcard blob (NVS / provisioning payload).
    pub fn encode(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::EncodeFailed)
    }

    /// Deserialize and validate a blob produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }
}
