//! Mock hardware for integration tests.
//!
//! Records every relay write so tests can assert on the full switching
//! history without touching real GPIO registers.  Time is simulated: the
//! clock only moves when a test advances it or when the controller
//! blocks in [`SimDelay`].

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use brewpump::app::ports::Clock;
use brewpump::config::PumpConfig;
use brewpump::fsm::OutputState;
use brewpump::PumpController;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin, StatefulOutputPin};

// ── Simulated time ────────────────────────────────────────────

/// Shared microsecond counter.
#[derive(Clone, Default)]
pub struct SimClock {
    us: Rc<Cell<u64>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn micros(&self) -> u64 {
        self.us.get()
    }

    pub fn advance_us(&self, us: u64) {
        self.us.set(self.us.get() + us);
    }

    /// Move forward to `secs`, never backward (settle delays may already
    /// have pushed the clock past it).
    pub fn advance_to_secs(&self, secs: u64) {
        self.us.set(self.us.get().max(secs * 1_000_000));
    }
}

impl Clock for SimClock {
    fn now_secs(&self) -> u64 {
        self.us.get() / 1_000_000
    }

    fn millis(&self) -> u64 {
        self.us.get() / 1_000
    }
}

/// Blocking delay that advances the shared clock and tallies total time.
#[derive(Clone)]
pub struct SimDelay {
    clock: SimClock,
    pub total_us: Rc<Cell<u64>>,
}

impl SimDelay {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            total_us: Rc::default(),
        }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let us = u64::from(ns).div_ceil(1_000);
        self.clock.advance_us(us);
        self.total_us.set(self.total_us.get() + us);
    }
}

// ── Relay output pin ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
pub struct PinLog {
    pub high: bool,
    /// Every level written, in order (`true` = HIGH).
    pub writes: Vec<bool>,
    pub fail_writes: bool,
}

/// Output pin whose log stays readable after the controller takes it.
#[derive(Clone, Default)]
pub struct MockOutputPin {
    pub log: Rc<RefCell<PinLog>>,
}

impl MockOutputPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.log.borrow().high
    }

    pub fn writes(&self) -> Vec<bool> {
        self.log.borrow().writes.clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.log.borrow_mut().fail_writes = fail;
    }

    /// Force the level behind the controller's back.
    pub fn force(&self, high: bool) {
        self.log.borrow_mut().high = high;
    }

    fn set(&mut self, high: bool) -> Result<(), MockPinError> {
        let mut log = self.log.borrow_mut();
        if log.fail_writes {
            return Err(MockPinError);
        }
        log.high = high;
        log.writes.push(high);
        Ok(())
    }
}

impl ErrorType for MockOutputPin {
    type Error = MockPinError;
}

impl OutputPin for MockOutputPin {
    fn set_low(&mut self) -> Result<(), MockPinError> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), MockPinError> {
        self.set(true)
    }
}

impl StatefulOutputPin for MockOutputPin {
    fn is_set_high(&mut self) -> Result<bool, MockPinError> {
        Ok(self.log.borrow().high)
    }

    fn is_set_low(&mut self) -> Result<bool, MockPinError> {
        Ok(!self.log.borrow().high)
    }
}

// ── Zero-cross input ──────────────────────────────────────────

/// 50 Hz square wave derived from the simulated clock: LOW for the first
/// 10 ms of every 20 ms, HIGH for the second.  Setting `stuck` pins the
/// line at one level, as with a dead detector.
pub struct ZeroCrossInput {
    clock: SimClock,
    pub reads: Rc<Cell<u32>>,
    pub stuck: Rc<Cell<Option<bool>>>,
}

impl ZeroCrossInput {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            reads: Rc::default(),
            stuck: Rc::default(),
        }
    }
}

impl ErrorType for ZeroCrossInput {
    type Error = core::convert::Infallible;
}

impl InputPin for ZeroCrossInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.reads.set(self.reads.get() + 1);
        if let Some(level) = self.stuck.get() {
            return Ok(level);
        }
        Ok(self.clock.micros() % 20_000 >= 10_000)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|h| !h)
    }
}

// ── Listener ──────────────────────────────────────────────────

pub type Notifications = Rc<RefCell<Vec<OutputState>>>;

/// Closure listener that records every notification.
pub fn recorder() -> (Notifications, impl FnMut(OutputState)) {
    let seen: Notifications = Rc::default();
    let sink = Rc::clone(&seen);
    (seen, move |state| sink.borrow_mut().push(state))
}

// ── Rig ───────────────────────────────────────────────────────

/// Everything a test needs to drive and observe one controller.
pub struct Rig<L> {
    pub pump: PumpController<MockOutputPin, ZeroCrossInput, SimClock, SimDelay, L>,
    pub pin: MockOutputPin,
    pub clock: SimClock,
    pub delay: SimDelay,
    pub zero_cross_stuck: Rc<Cell<Option<bool>>>,
}

impl<L: FnMut(OutputState)> Rig<L> {
    /// Controller with a zero-cross line fitted (gate still off unless the
    /// config enables it).
    pub fn new(config: PumpConfig, listener: L) -> Self {
        let clock = SimClock::new();
        let delay = SimDelay::new(&clock);
        let pin = MockOutputPin::new();
        let zero_cross = ZeroCrossInput::new(&clock);
        let zero_cross_stuck = Rc::clone(&zero_cross.stuck);
        let pump = PumpController::new(
            pin.clone(),
            Some(zero_cross),
            clock.clone(),
            delay.clone(),
            listener,
            config,
        )
        .expect("mock pin write cannot fail at construction");
        Self {
            pump,
            pin,
            clock,
            delay,
            zero_cross_stuck,
        }
    }

    /// Advance to `secs` and run one tick.
    pub fn tick_at(&mut self, secs: u64) {
        self.clock.advance_to_secs(secs);
        self.pump.process().expect("process");
    }
}

/// Config with zero settle delay so simulated seconds stay exact.
pub fn quiet_config() -> PumpConfig {
    PumpConfig {
        relay_settle_ms: 0,
        ..PumpConfig::default()
    }
}
