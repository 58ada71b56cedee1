//! Pump controller: the polling state machine.
//!
//! [`PumpController`] owns every piece of runtime state for one pump and
//! is the only thing that mutates it.  Callers drive it from a single
//! loop: push temperatures, call [`process`](PumpController::process)
//! regularly, and forward user intent through
//! [`toggle`](PumpController::toggle) / [`turn_off`](PumpController::turn_off).
//!
//! ```text
//!  temperature ─▶ ┌──────────────────────────────┐
//!  clock       ─▶ │ interlock → vent → rest      │ requested ─▶ PhaseSync ─▶ RelayOutput ─▶ pin
//!  toggle      ─▶ │ → reconcile                  │                                   └─▶ OutputListener
//!                 └──────────────────────────────┘
//! ```
//!
//! Nothing here is reentrant and nothing locks; serialize all calls.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, StatefulOutputPin};
use log::{debug, info};

use crate::config::PumpConfig;
use crate::drivers::phase_sync::{NoSyncInput, PhaseSync, SyncOutcome};
use crate::drivers::relay::{Polarity, RelayOutput};
use crate::error::Result;
use crate::fsm::grain_rest::GrainRestScheduler;
use crate::fsm::ventilation::{VentStep, VentilationCycle};
use crate::fsm::{ControlState, OperatingMode, OutputState, PumpStatus};
use crate::safety::{ThermalInterlock, over_temperature};

use super::ports::{Clock, OutputListener};

// ───────────────────────────────────────────────────────────────
// PumpController
// ───────────────────────────────────────────────────────────────

pub struct PumpController<O, S, C, D, L> {
    config: PumpConfig,

    // -- Hardware --
    relay: RelayOutput<O>,
    phase_sync: PhaseSync<S>,
    clock: C,
    delay: D,
    listener: L,

    // -- Sub-mechanisms --
    interlock: ThermalInterlock,
    ventilation: VentilationCycle,
    grain_rest: GrainRestScheduler,

    // -- Runtime state --
    operating_mode: OperatingMode,
    control_state: ControlState,
    requested_output: OutputState,
    actual_output: OutputState,
    temperature_c: Option<f32>,
    /// One-shot; raised on a requested/actual mismatch, cleared by [`state_changed`](Self::state_changed).
    state_changed: bool,
    mashing_active: bool,
    inhibit_grain_rest_near_setpoint: bool,
    phase_sync_timeouts: u32,
}

impl<O, C, D, L> PumpController<O, NoSyncInput, C, D, L>
where
    O: StatefulOutputPin,
    C: Clock,
    D: DelayNs,
    L: OutputListener,
{
    /// Controller for a rig without a zero-cross detector.
    pub fn without_phase_sync(
        output: O,
        clock: C,
        delay: D,
        listener: L,
        config: PumpConfig,
    ) -> Result<Self> {
        Self::new(output, None, clock, delay, listener, config)
    }
}

impl<O, S, C, D, L> PumpController<O, S, C, D, L>
where
    O: StatefulOutputPin,
    S: InputPin,
    C: Clock,
    D: DelayNs,
    L: OutputListener,
{
    /// Bind the pump to its pins and drive the output to OFF.
    ///
    /// All runtime state starts in the STOPPED / OFF position.
    pub fn new(
        output: O,
        phase_sync: Option<S>,
        clock: C,
        delay: D,
        listener: L,
        config: PumpConfig,
    ) -> Result<Self> {
        let mut relay = RelayOutput::new(output);
        relay.write(OutputState::Off, config.polarity)?;

        let phase_sync = PhaseSync::new(phase_sync);
        info!(
            "pump: ready ({:?}, phase sync {})",
            config.polarity,
            if phase_sync.is_fitted() { "fitted" } else { "absent" }
        );

        Ok(Self {
            inhibit_grain_rest_near_setpoint: config.grain_rest.inhibit_near_setpoint,
            config,
            relay,
            phase_sync,
            clock,
            delay,
            listener,
            interlock: ThermalInterlock::new(),
            ventilation: VentilationCycle::new(),
            grain_rest: GrainRestScheduler::new(),
            operating_mode: OperatingMode::Off,
            control_state: ControlState::Stopped,
            requested_output: OutputState::Off,
            actual_output: OutputState::Off,
            temperature_c: None,
            state_changed: false,
            mashing_active: false,
            phase_sync_timeouts: 0,
        })
    }

    // ── User intent ───────────────────────────────────────────

    /// Start a stopped pump, or stop a running one.
    ///
    /// Starting is silently ignored while the thermal interlock is
    /// tripped.  Stopping is immediate: any ventilation or rest in
    /// progress is abandoned, no venting-down.
    pub fn toggle(&mut self) {
        if self.control_state.is_active() {
            self.operating_mode = OperatingMode::Off;
            self.requested_output = OutputState::Off;
            self.set_control_state(ControlState::Stopped);
            return;
        }

        if over_temperature(&self.config.interlock, self.temperature_c) {
            debug!("pump: activation ignored, thermal interlock tripped");
            return;
        }

        if self.config.ventilation.enabled {
            self.ventilation.restart();
            self.requested_output = OutputState::Off;
            self.set_control_state(ControlState::Ventilating);
        } else {
            self.requested_output = OutputState::On;
            self.set_control_state(ControlState::Running);
        }
        self.operating_mode = OperatingMode::On;
        self.reset_grain_rest();
    }

    /// Explicit shutdown, independent of the polling state machine.
    ///
    /// Switches the relay off right away (phase-synced if enabled) and
    /// notifies the listener if it was on.
    pub fn turn_off(&mut self) -> Result<()> {
        self.operating_mode = OperatingMode::Off;
        self.requested_output = OutputState::Off;
        self.set_control_state(ControlState::Stopped);

        let polarity = self.config.polarity;
        let was_on = !self.relay.is_at(OutputState::Off, polarity)?;
        if was_on {
            self.sync_to_zero_cross();
            self.relay.write(OutputState::Off, polarity)?;
        }
        self.actual_output = OutputState::Off;

        if was_on {
            self.delay.delay_ms(self.config.relay_settle_ms);
            info!("pump: output OFF (explicit shutdown)");
            self.listener.on_output_changed(OutputState::Off);
        }
        Ok(())
    }

    // ── Polling entry point ───────────────────────────────────

    /// Run one control tick.
    ///
    /// 1. Thermal interlock: if tripped, force STOPPED / OFF and skip 2–3.
    /// 2. Ventilation, if venting.
    /// 3. Grain rest, if resting.
    /// 4. Reconcile the relay with the requested output.
    ///
    /// At most one of 2 and 3 advances per tick.  Only output pin faults
    /// produce an error; `actual_output` is left untouched in that case.
    pub fn process(&mut self) -> Result<()> {
        let now = self.clock.now_secs();

        if self
            .interlock
            .evaluate(&self.config.interlock, self.temperature_c)
        {
            self.requested_output = OutputState::Off;
            self.set_control_state(ControlState::Stopped);
        } else {
            if self.control_state == ControlState::Ventilating {
                self.advance_ventilation(now);
            }

            if self.control_state == ControlState::GrainResting
                && self.operating_mode == OperatingMode::On
                && self.config.grain_rest.length_mins != 0
            {
                self.advance_grain_rest(now);
            }
        }

        if self.requested_output != self.actual_output {
            self.state_changed = true;
        }
        self.drive_output(self.requested_output)
    }

    // ── Grain rests ───────────────────────────────────────────

    /// Schedule the next grain rest one full period from now.
    pub fn reset_grain_rest(&mut self) {
        let now = self.clock.now_secs();
        self.grain_rest.reset(now, &self.config.grain_rest);
    }

    /// A rest period has elapsed while running.
    ///
    /// Does not look at the near-setpoint inhibit or the mashing flag;
    /// the heating controller weighs those before calling
    /// [`begin_grain_rest`](Self::begin_grain_rest).
    pub fn grain_rest_due(&self) -> bool {
        let g = &self.config.grain_rest;
        self.control_state == ControlState::Running
            && self.operating_mode == OperatingMode::On
            && g.enabled
            && g.length_mins != 0
            && self.grain_rest.is_due(self.clock.now_secs())
    }

    /// Pause the running pump for the configured rest length.
    ///
    /// The pump re-vents when the rest ends.  Returns `false` (and does
    /// nothing) unless running in mode ON with grain rests and ventilation
    /// enabled and a non-zero rest length.
    pub fn begin_grain_rest(&mut self) -> bool {
        if !self.grain_rest_armable() {
            debug!("pump: grain rest not armable in {}", self.control_state);
            return false;
        }
        let now = self.clock.now_secs();
        self.grain_rest.begin(now, &self.config.grain_rest);
        info!(
            "pump: grain rest for {} min (until t={})",
            self.config.grain_rest.length_mins,
            self.grain_rest.window_end()
        );
        self.set_control_state(ControlState::GrainResting);
        true
    }

    /// A rest is due and a mash is in progress.  Rests only serve the
    /// grain bed, so outside mashing they never start.
    pub fn grain_rest_due_while_mashing(&self) -> bool {
        self.mashing_active && self.grain_rest_due()
    }

    pub fn inhibit_grain_rest_near_setpoint(&mut self) {
        self.inhibit_grain_rest_near_setpoint = true;
    }

    pub fn permit_grain_rest_near_setpoint(&mut self) {
        self.inhibit_grain_rest_near_setpoint = false;
    }

    // ── External inputs and flags ─────────────────────────────

    /// Latest pump temperature (Celsius) for the interlock.
    pub fn update_temperature(&mut self, temperature_c: f32) {
        self.temperature_c = Some(temperature_c);
    }

    pub fn begin_mashing_control(&mut self) {
        self.mashing_active = true;
    }

    pub fn end_mashing_control(&mut self) {
        self.mashing_active = false;
    }

    /// Drive the relay LOW for ON.  Call before the first `process()`.
    pub fn switch_to_negative_logic(&mut self) {
        self.config.polarity = Polarity::ActiveLow;
        info!("pump: negative output logic selected");
    }

    /// True exactly once per observed requested/actual mismatch.
    pub fn state_changed(&mut self) -> bool {
        core::mem::take(&mut self.state_changed)
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn config(&self) -> &PumpConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PumpConfig {
        &mut self.config
    }

    pub fn operating_mode(&self) -> OperatingMode {
        self.operating_mode
    }

    pub fn control_state(&self) -> ControlState {
        self.control_state
    }

    pub fn requested_output(&self) -> OutputState {
        self.requested_output
    }

    pub fn actual_output(&self) -> OutputState {
        self.actual_output
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature_c
    }

    pub fn is_interlocked(&self) -> bool {
        over_temperature(&self.config.interlock, self.temperature_c)
    }

    pub fn ventilation_cycles_done(&self) -> u8 {
        self.ventilation.cycles_done()
    }

    /// When the ventilation ON/OFF interval in progress closes (seconds).
    pub fn ventilation_interval_end(&self) -> u64 {
        self.ventilation.interval_end()
    }

    pub fn grain_rest_period_start(&self) -> u64 {
        self.grain_rest.period_start()
    }

    pub fn grain_rest_window_end(&self) -> u64 {
        self.grain_rest.window_end()
    }

    /// Result of the interlock evaluation made by the last `process()`.
    pub fn interlock_tripped(&self) -> bool {
        self.interlock.is_tripped()
    }

    /// Relay switches made after a zero-cross wait gave up.
    pub fn phase_sync_timeouts(&self) -> u32 {
        self.phase_sync_timeouts
    }

    pub fn is_mashing(&self) -> bool {
        self.mashing_active
    }

    pub fn grain_rest_inhibited_near_setpoint(&self) -> bool {
        self.inhibit_grain_rest_near_setpoint
    }

    pub fn status(&self) -> PumpStatus {
        PumpStatus {
            operating_mode: self.operating_mode,
            control_state: self.control_state,
            requested_output: self.requested_output,
            actual_output: self.actual_output,
            temperature_c: self.temperature_c,
            interlocked: self.is_interlocked(),
            interlock_tripped: self.interlock.is_tripped(),
            phase_sync_timeouts: self.phase_sync_timeouts,
            ventilation_cycles_done: self.ventilation.cycles_done(),
            ventilation_interval_end: self.ventilation.interval_end(),
            grain_rest_period_start: self.grain_rest.period_start(),
            grain_rest_window_end: self.grain_rest.window_end(),
            mashing_active: self.mashing_active,
            grain_rest_inhibited_near_setpoint: self.inhibit_grain_rest_near_setpoint,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn advance_ventilation(&mut self, now: u64) {
        match self.ventilation.poll(now, &self.config.ventilation) {
            VentStep::Hold(output) => self.requested_output = output,
            VentStep::Complete => {
                info!(
                    "pump: ventilation complete after {} cycles",
                    self.ventilation.cycles_done()
                );
                if self.operating_mode == OperatingMode::On {
                    self.requested_output = OutputState::On;
                    self.set_control_state(ControlState::Running);
                } else {
                    self.requested_output = OutputState::Off;
                    self.set_control_state(ControlState::Stopped);
                }
            }
        }
    }

    fn advance_grain_rest(&mut self, now: u64) {
        // Held off for the whole window.  Actual is forced too, so the
        // switch into the rest raises neither the flag nor the listener.
        self.requested_output = OutputState::Off;
        self.actual_output = OutputState::Off;

        if !self.grain_rest.window_elapsed(now) {
            return;
        }

        if self.operating_mode == OperatingMode::Off {
            self.set_control_state(ControlState::Stopped);
        } else {
            // Settling grain can trap air again: mandatory re-vent.
            info!("pump: grain rest over, re-venting");
            self.ventilation.restart();
            self.set_control_state(ControlState::Ventilating);
        }
    }

    /// A rest ends in a re-vent, so it needs ventilation enabled as well.
    fn grain_rest_armable(&self) -> bool {
        let g = &self.config.grain_rest;
        self.control_state == ControlState::Running
            && self.operating_mode == OperatingMode::On
            && g.enabled
            && g.length_mins != 0
            && self.config.ventilation.enabled
    }

    /// Drive the relay toward `target`, phase-synced, then settle and
    /// notify if this is a change from the recorded actual output.
    fn drive_output(&mut self, target: OutputState) -> Result<()> {
        let previous = self.actual_output;
        let polarity = self.config.polarity;

        if !self.relay.is_at(target, polarity)? {
            self.sync_to_zero_cross();
            self.relay.write(target, polarity)?;
        }

        if target != previous {
            self.delay.delay_ms(self.config.relay_settle_ms);
            info!("pump: output {} -> {}", previous, target);
            self.listener.on_output_changed(target);
        }

        self.actual_output = target;
        Ok(())
    }

    fn sync_to_zero_cross(&mut self) {
        let outcome = self
            .phase_sync
            .wait(&self.config.phase_sync, &self.clock, &mut self.delay);
        if outcome == SyncOutcome::TimedOut {
            self.phase_sync_timeouts = self.phase_sync_timeouts.saturating_add(1);
        }
    }

    fn set_control_state(&mut self, next: ControlState) {
        if next != self.control_state {
            info!("pump: {} -> {}", self.control_state, next);
            self.control_state = next;
        }
    }
}
