//! Pump relay output driver.
//!
//! A single digital output switches the pump relay (or SSR).  The driver
//! maps the logical [`OutputState`] onto a pin level through the
//! configured [`Polarity`] and reads the driven level back so callers
//! can skip writes that would not change anything.
//!
//! Sequencing (phase sync, settle delay, change notification) is the
//! controller's job; this driver is a dumb actuator.

use embedded_hal::digital::{Error as _, PinState, StatefulOutputPin};
use serde::{Deserialize, Serialize};

use crate::error::ActuatorError;
use crate::fsm::OutputState;

/// Mapping between logical ON/OFF and physical pin levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Polarity {
    /// HIGH = ON, LOW = OFF.
    #[default]
    ActiveHigh,
    /// LOW = ON, HIGH = OFF.
    ActiveLow,
}

impl Polarity {
    /// Pin level that encodes `state`.
    pub fn level(self, state: OutputState) -> PinState {
        match (self, state) {
            (Self::ActiveHigh, OutputState::On) | (Self::ActiveLow, OutputState::Off) => {
                PinState::High
            }
            (Self::ActiveHigh, OutputState::Off) | (Self::ActiveLow, OutputState::On) => {
                PinState::Low
            }
        }
    }
}

pub struct RelayOutput<P> {
    pin: P,
}

impl<P: StatefulOutputPin> RelayOutput<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// True if the pin currently drives the level that encodes `state`.
    pub fn is_at(&mut self, state: OutputState, polarity: Polarity) -> Result<bool, ActuatorError> {
        let high = self
            .pin
            .is_set_high()
            .map_err(|e| ActuatorError::GpioReadFailed(e.kind()))?;
        Ok(PinState::from(high) == polarity.level(state))
    }

    pub fn write(&mut self, state: OutputState, polarity: Polarity) -> Result<(), ActuatorError> {
        self.pin
            .set_state(polarity.level(state))
            .map_err(|e| ActuatorError::GpioWriteFailed(e.kind()))
    }
}
