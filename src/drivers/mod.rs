//! Pump relay output, zero-cross switching gate and the toggle button.

pub mod button;
pub mod phase_sync;
pub mod relay;
