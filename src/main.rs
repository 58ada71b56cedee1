//! BrewPump Firmware — Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                    │
//! │                                                          │
//! │  PinDriver (relay, zero-cross)   BoardClock   Delay      │
//! │  LogOutputListener (OutputListener)                      │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ─────────────      │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │        PumpController (pure logic)             │      │
//! │  │  Ventilation · Grain rest · Interlock          │      │
//! │  └────────────────────────────────────────────────┘      │
//! │                                                          │
//! │  Polling loop: button edge → toggle, process() per tick  │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

mod pins;

use anyhow::Result;
use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::delay::{Delay, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use brewpump::adapters::log_sink::LogOutputListener;
use brewpump::adapters::time::BoardClock;
use brewpump::app::ports::Clock;
use brewpump::drivers::button::{ButtonEvent, DebouncedButton};
use brewpump::sensors::ntc;
use brewpump::{PumpConfig, PumpController};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  BrewPump v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    let config = PumpConfig::default();
    if let Err(e) = config.validate() {
        warn!("Default config rejected ({}), continuing anyway", e);
    }

    // ── 3. Pins ───────────────────────────────────────────────
    let peripherals = Peripherals::take()?;

    // SAFETY: each GPIO number in `pins` is claimed exactly once, here.
    let relay = PinDriver::output(unsafe { AnyOutputPin::new(pins::PUMP_RELAY_GPIO) })?;
    let zero_cross = PinDriver::input(unsafe { AnyIOPin::new(pins::ZERO_CROSS_GPIO) })?;
    let mut button = PinDriver::input(unsafe { AnyIOPin::new(pins::BUTTON_GPIO) })?;
    button.set_pull(Pull::Up)?;

    // Pump housing NTC on GPIO9 (ADC1_CH8).
    let adc = AdcDriver::new(peripherals.adc1)?;
    let adc_config = AdcChannelConfig {
        attenuation: DB_11,
        ..Default::default()
    };
    let mut pump_ntc = AdcChannelDriver::new(&adc, peripherals.pins.gpio9, &adc_config)?;

    // ── 4. Controller ─────────────────────────────────────────
    let mut pump = PumpController::new(
        relay,
        Some(zero_cross),
        BoardClock::new(),
        Delay::new_default(),
        LogOutputListener::new(),
        config,
    )?;

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    let clock = BoardClock::new();
    let mut toggle_button = DebouncedButton::new();
    let mut probe_fault_logged = false;
    loop {
        match adc.read_raw(&mut pump_ntc).ok().and_then(ntc::adc_to_celsius) {
            Some(celsius) => {
                pump.update_temperature(celsius);
                probe_fault_logged = false;
            }
            None if !probe_fault_logged => {
                warn!("Pump temperature probe open/shorted, holding last reading");
                probe_fault_logged = true;
            }
            None => {}
        }

        if toggle_button.tick(button.is_low(), clock.millis()) == Some(ButtonEvent::Press) {
            pump.toggle();
        }

        if let Err(e) = pump.process() {
            warn!("Pump output fault: {}", e);
        }

        if pump.state_changed() {
            info!(
                "STATUS | state={} | mode={:?} | output={} | vent_cycles={} | temp={:?}",
                pump.control_state(),
                pump.operating_mode(),
                pump.actual_output(),
                pump.ventilation_cycles_done(),
                pump.temperature()
            );
        }

        // Mashing is flagged by the heating controller; rests only happen inside a mash.
        if pump.grain_rest_due_while_mashing() {
            pump.begin_grain_rest();
        }

        FreeRtos::delay_ms(pins::CONTROL_TICK_MS);
    }
}
