//! NTC thermistor on the pump housing (10 kOhm @ 25 C, B = 3950).
//!
//! Wired as the low side of a divider with a fixed 10 kOhm resistor to
//! 3.3 V, sampled by a 12-bit ADC.  The Beta equation converts the
//! thermistor resistance to temperature.
//!
//! Readings pinned to either rail mean an open or shorted probe and are
//! reported as `None`, which the interlock treats as "no reading".

const R25: f32 = 10_000.0;
const BETA: f32 = 3950.0;
const T25_K: f32 = 298.15;
const R_DIVIDER: f32 = 10_000.0;
const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;

/// Margin from either rail treated as a wiring fault (volts).
const RAIL_MARGIN_V: f32 = 0.01;

/// Convert a raw 12-bit ADC count to degrees Celsius.
pub fn adc_to_celsius(raw: u16) -> Option<f32> {
    let voltage = (f32::from(raw) / ADC_MAX) * V_REF;
    if voltage <= RAIL_MARGIN_V || voltage >= V_REF - RAIL_MARGIN_V {
        return None;
    }
    let r_ntc = R_DIVIDER * voltage / (V_REF - voltage);
    let inv_t = (1.0 / T25_K) + (1.0 / BETA) * (r_ntc / R25).ln();
    if inv_t <= 0.0 {
        return None;
    }
    Some(1.0 / inv_t - 273.15)
}
