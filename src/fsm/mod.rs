//! Pump control state machine vocabulary.
//!
//! ```text
//!            toggle (vent enabled)              vent complete, mode ON
//!  STOPPED ──────────────────────▶ VENTILATING ─────────────────────▶ RUNNING
//!     ▲  ╲                              ▲                               │
//!     │   ╲ toggle (vent disabled)      │ rest elapsed                  │ begin_grain_rest
//!     │    ╲────────────────────────────┼──────────────────────────▶    ▼
//!     │                                 └────────────────────── GRAIN_REST
//!     │
//!     └──── toggle / turn_off / interlock (from any active state)
//! ```
//!
//! The transition logic itself lives in
//! [`PumpController`](crate::app::controller::PumpController); the
//! ventilation and grain-rest timers it advances are in the submodules.

pub mod grain_rest;
pub mod ventilation;

use core::fmt;

use serde::{Deserialize, Serialize};

/// The user's desired steady-state target, flipped by toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OperatingMode {
    #[default]
    Off,
    On,
}

/// Current behavioural phase of the pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlState {
    #[default]
    Stopped,
    Ventilating,
    Running,
    GrainResting,
}

impl ControlState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Ventilating => "Ventilating",
            Self::Running => "Running",
            Self::GrainResting => "GrainResting",
        }
    }

    /// Anything but `Stopped`.
    pub fn is_active(self) -> bool {
        self != Self::Stopped
    }
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical relay output, independent of pin polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputState {
    #[default]
    Off,
    On,
}

impl fmt::Display for OutputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "OFF",
            Self::On => "ON",
        })
    }
}

/// Point-in-time snapshot of the controller's runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PumpStatus {
    pub operating_mode: OperatingMode,
    pub control_state: ControlState,
    pub requested_output: OutputState,
    pub actual_output: OutputState,
    pub temperature_c: Option<f32>,
    /// Over temperature right now.
    pub interlocked: bool,
    /// Held off by the interlock at the last tick.
    pub interlock_tripped: bool,
    pub phase_sync_timeouts: u32,
    pub ventilation_cycles_done: u8,
    pub ventilation_interval_end: u64,
    pub grain_rest_period_start: u64,
    pub grain_rest_window_end: u64,
    pub mashing_active: bool,
    pub grain_rest_inhibited_near_setpoint: bool,
}
