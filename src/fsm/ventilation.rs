//! Startup ventilation (air purge) cycle generator.
//!
//! For `N` configured cycles the pump is pulsed ON/OFF exactly `N` times,
//! starting ON:
//!
//! ```text
//!  output  ▕▔▔ on ▔▔▏_off_▕▔▔ on ▔▔▏_off_ ... ▕▔▔ on ▔▔▏_off_▕ done
//!  cycles   0         1     1         2             N-1      N
//! ```
//!
//! The generator is sampled by the polling loop, so each boundary is seen
//! on the first poll at or after it; an interval can overrun by up to one
//! polling period.  The next interval is timed from the poll that closed
//! the previous one.

use log::debug;

use crate::config::VentilationConfig;
use crate::fsm::OutputState;

/// What the generator wants on the output after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VentStep {
    /// Sequence still running; drive this output.
    Hold(OutputState),
    /// All cycles done.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    On,
    Off,
}

#[derive(Debug, Clone, Default)]
pub struct VentilationCycle {
    /// Completed ON intervals.
    cycles_done: u8,
    /// `None` until the first poll after a (re)start.
    phase: Option<Phase>,
    interval_end: u64,
}

impl VentilationCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a fresh sequence.  The first ON interval opens on the next poll.
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    /// Advance the sequence to `now` (seconds).
    pub fn poll(&mut self, now: u64, config: &VentilationConfig) -> VentStep {
        let phase = match self.phase {
            Some(phase) => phase,
            None => {
                if config.cycles == 0 {
                    return VentStep::Complete;
                }
                self.open(Phase::On, now, config)
            }
        };

        if now < self.interval_end {
            return VentStep::Hold(output_for(phase));
        }

        match phase {
            Phase::On => {
                self.cycles_done = self.cycles_done.saturating_add(1);
                self.open(Phase::Off, now, config);
                VentStep::Hold(OutputState::Off)
            }
            Phase::Off if self.cycles_done >= config.cycles => VentStep::Complete,
            Phase::Off => {
                self.open(Phase::On, now, config);
                VentStep::Hold(OutputState::On)
            }
        }
    }

    pub fn cycles_done(&self) -> u8 {
        self.cycles_done
    }

    /// End (seconds) of the interval in progress.
    pub fn interval_end(&self) -> u64 {
        self.interval_end
    }

    fn open(&mut self, phase: Phase, now: u64, config: &VentilationConfig) -> Phase {
        let length = match phase {
            Phase::On => config.on_secs,
            Phase::Off => config.off_secs,
        };
        self.phase = Some(phase);
        self.interval_end = now + u64::from(length);
        debug!(
            "vent: {} until t={} ({} cycles done)",
            output_for(phase),
            self.interval_end,
            self.cycles_done
        );
        phase
    }
}

fn output_for(phase: Phase) -> OutputState {
    match phase {
        Phase::On => OutputState::On,
        Phase::Off => OutputState::Off,
    }
}
