//! Application core: the pump state machine and its port boundary.
//!
//! [`controller::PumpController`] holds the decision logic.  Everything
//! it needs from the platform comes in through `embedded-hal` traits and
//! the port traits in [`ports`], so the whole engine runs on the host
//! against mock pins and a simulated clock.

pub mod controller;
pub mod ports;
