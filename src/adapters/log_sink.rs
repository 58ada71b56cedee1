//! Log-based output listener adapter.
//!
//! Implements [`OutputListener`] by writing every relay change to the
//! logger (UART / USB-CDC on target).  A display driver would implement
//! the same trait, or pass a closure.

use log::info;

use crate::app::ports::OutputListener;
use crate::fsm::OutputState;

/// Adapter that logs every confirmed relay change and counts them.
#[derive(Debug, Default)]
pub struct LogOutputListener {
    changes: u32,
}

impl LogOutputListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relay changes seen since construction.
    pub fn changes(&self) -> u32 {
        self.changes
    }
}

impl OutputListener for LogOutputListener {
    fn on_output_changed(&mut self, state: OutputState) {
        self.changes = self.changes.wrapping_add(1);
        info!("OUTPUT | pump={} | changes={}", state, self.changes);
    }
}
