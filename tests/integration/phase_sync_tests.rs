//! Zero-cross aligned switching through the full controller.
//!
//! The mock zero-cross line is a 50 Hz square wave on the simulated
//! clock (rising edge at 10 ms into every 20 ms), so the instant the
//! relay is written can be read straight off the clock.

use brewpump::fsm::OutputState;

use super::mock_hw::{quiet_config, recorder, Rig};

fn synced(pre_activation_delay_ms: u32) -> brewpump::PumpConfig {
    let mut config = quiet_config();
    config.ventilation.enabled = false;
    config.phase_sync.enabled = true;
    config.phase_sync.pre_activation_delay_ms = pre_activation_delay_ms;
    config
}

#[test]
fn switch_waits_for_the_next_rising_edge() {
    let (_, listener) = recorder();
    let mut rig = Rig::new(synced(0), listener);
    rig.pump.toggle();
    rig.pump.process().unwrap();

    assert!(rig.pin.is_high());
    assert_eq!(rig.clock.micros(), 10_000);
}

#[test]
fn pre_activation_delay_follows_the_edge() {
    let (_, listener) = recorder();
    let mut rig = Rig::new(synced(3), listener);
    rig.pump.toggle();
    rig.pump.process().unwrap();
    assert_eq!(rig.clock.micros(), 13_000);
}

#[test]
fn high_half_cycle_is_waited_out_first() {
    let (_, listener) = recorder();
    let mut rig = Rig::new(synced(0), listener);
    rig.clock.advance_us(12_000);
    rig.pump.toggle();
    rig.pump.process().unwrap();
    // Falls at 20 ms, rises again at 30 ms.
    assert_eq!(rig.clock.micros(), 30_000);
}

#[test]
fn no_wait_when_the_pin_is_already_there() {
    let (_, listener) = recorder();
    let mut rig = Rig::new(synced(0), listener);
    for t in 0..5 {
        rig.tick_at(t);
    }
    assert_eq!(rig.clock.micros(), 4_000_000);
    assert_eq!(rig.pin.writes(), [false]);
}

#[test]
fn disabled_gate_switches_immediately() {
    let mut config = synced(5);
    config.phase_sync.enabled = false;
    let (_, listener) = recorder();
    let mut rig = Rig::new(config, listener);
    rig.pump.toggle();
    rig.pump.process().unwrap();
    assert!(rig.pin.is_high());
    assert_eq!(rig.clock.micros(), 0);
}

#[test]
fn turn_off_is_phase_synced_too() {
    let (seen, listener) = recorder();
    let mut rig = Rig::new(synced(0), listener);
    rig.pump.toggle();
    rig.tick_at(1);

    rig.pump.turn_off().unwrap();
    assert!(!rig.pin.is_high());
    // Switched on at 1.010 s, in the HIGH half: fall at 1.020, rise at 1.030.
    assert_eq!(rig.clock.micros(), 1_030_000);
    assert_eq!(*seen.borrow(), [OutputState::On, OutputState::Off]);
}

#[test]
fn ventilation_timing_survives_sync_waits() {
    let mut config = synced(9);
    config.ventilation.enabled = true;
    let (seen, listener) = recorder();
    let mut rig = Rig::new(config, listener);
    rig.pump.toggle();
    for t in 0..=21 {
        rig.tick_at(t);
    }
    assert_eq!(seen.borrow().len(), 7);
    assert_eq!(rig.pump.actual_output(), OutputState::On);
}

#[test]
fn dead_detector_switches_after_timeout_and_is_counted() {
    let (seen, listener) = recorder();
    let mut rig = Rig::new(synced(0), listener);
    rig.zero_cross_stuck.set(Some(false));
    rig.pump.toggle();
    rig.pump.process().unwrap();

    assert!(rig.pin.is_high());
    assert_eq!(*seen.borrow(), [OutputState::On]);
    assert_eq!(rig.pump.phase_sync_timeouts(), 1);
    assert_eq!(rig.pump.status().phase_sync_timeouts, 1);
    // One bounded wait, just over the 20 ms limit.
    assert!(rig.clock.micros() > 20_000 && rig.clock.micros() <= 21_050);

    rig.pump.turn_off().unwrap();
    assert_eq!(rig.pump.phase_sync_timeouts(), 2);
}

#[test]
fn healthy_detector_records_no_timeouts() {
    let (_, listener) = recorder();
    let mut rig = Rig::new(synced(0), listener);
    rig.pump.toggle();
    rig.tick_at(0);
    rig.pump.turn_off().unwrap();
    assert_eq!(rig.pump.phase_sync_timeouts(), 0);
}
