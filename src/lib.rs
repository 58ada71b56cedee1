//! Brewing pump controller library.
//!
//! Polling state machine for a single relay-switched pump: startup
//! ventilation, periodic grain rests, a thermal interlock, and optional
//! zero-cross aligned switching.  Hardware is reached only through
//! `embedded-hal` traits and the ports in [`app::ports`]; ESP-IDF-specific
//! code is guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod safety;
pub mod sensors;

pub use app::controller::PumpController;
pub use app::ports::{Clock, OutputListener};
pub use config::PumpConfig;
pub use drivers::phase_sync::NoSyncInput;
pub use drivers::relay::Polarity;
pub use error::{Error, Result};
pub use fsm::{ControlState, OperatingMode, OutputState, PumpStatus};
