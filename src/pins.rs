//! GPIO pin assignments for the pump controller board.
//!
//! Single source of truth for the target binary.  The library itself
//! takes pins as `embedded-hal` objects and never hard-codes numbers.

// ---------------------------------------------------------------------------
// Pump relay / SSR
// ---------------------------------------------------------------------------

/// Digital output driving the pump relay coil or SSR input.
pub const PUMP_RELAY_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Mains zero-cross detector
// ---------------------------------------------------------------------------

/// Digital input from the optocoupled zero-cross detector.
/// HIGH during the positive half-cycle.
pub const ZERO_CROSS_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// User button (active-low with external pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button: toggles the pump.
pub const BUTTON_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Pump temperature (NTC divider)
// ---------------------------------------------------------------------------

// GPIO9 / ADC1_CH8: pump housing thermistor.  ADC pins are bound by
// type in `main` (`peripherals.pins.gpio9`), so there is no number here.

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Control loop period (milliseconds).
pub const CONTROL_TICK_MS: u32 = 250;
