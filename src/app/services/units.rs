//! Unit conversions and derived fields
//!
//! Pure, stateless conversions applied by both parsing pipelines before a
//! record is emitted. Every conversion takes and returns `Option<f64>`:
//! an absent (or non-finite) input always yields an absent output.
//!
//! Rounding: temperatures and wave heights to one decimal place, speeds and
//! angles to whole units.

use crate::app::models::{Measurements, NormalizedRecord, SpeedUnit, WindSpeed};
use crate::constants::{
    COMPASS_POINTS, DEGREES_PER_COMPASS_POINT, FEET_PER_METER, KNOTS_PER_MPS, METERS_PER_FOOT,
    MPH_PER_KNOT, MPH_PER_MPS,
};
use chrono::{DateTime, Utc};

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // avoid emitting -0.0
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// One decimal place, for temperatures and heights
pub fn round_tenth(value: Option<f64>) -> Option<f64> {
    finite(value).map(|v| round_to(v, 1))
}

/// Whole units, for speeds and angles
pub fn round_whole(value: Option<f64>) -> Option<f64> {
    finite(value).map(|v| round_to(v, 0))
}

// =============================================================================
// Temperature
// =============================================================================

pub fn c_to_f(celsius: Option<f64>) -> Option<f64> {
    round_whole(finite(celsius).map(|c| c * 9.0 / 5.0 + 32.0))
}

pub fn f_to_c(fahrenheit: Option<f64>) -> Option<f64> {
    round_tenth(finite(fahrenheit).map(fahrenheit_to_celsius))
}

/// Unrounded conversion used at extraction time
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

// =============================================================================
// Length
// =============================================================================

pub fn m_to_ft(meters: Option<f64>) -> Option<f64> {
    round_tenth(finite(meters).map(|m| m * FEET_PER_METER))
}

pub fn ft_to_m(feet: Option<f64>) -> Option<f64> {
    round_tenth(finite(feet).map(feet_to_meters))
}

/// Unrounded conversion used at extraction time
pub fn feet_to_meters(feet: f64) -> f64 {
    feet * METERS_PER_FOOT
}

// =============================================================================
// Speed
// =============================================================================

pub fn mps_to_mph(mps: Option<f64>) -> Option<f64> {
    round_whole(finite(mps).map(|v| v * MPH_PER_MPS))
}

pub fn kts_to_mph(knots: Option<f64>) -> Option<f64> {
    round_whole(finite(knots).map(|v| v * MPH_PER_KNOT))
}

pub fn mph_to_kts(mph: Option<f64>) -> Option<f64> {
    round_whole(finite(mph).map(|v| v / MPH_PER_KNOT))
}

pub fn mph_to_mps(mph: Option<f64>) -> Option<f64> {
    round_whole(finite(mph).map(|v| v / MPH_PER_MPS))
}

pub fn mps_to_kts(mps: Option<f64>) -> Option<f64> {
    round_whole(finite(mps).map(|v| v * KNOTS_PER_MPS))
}

pub fn kts_to_mps(knots: Option<f64>) -> Option<f64> {
    round_whole(finite(knots).map(|v| v / KNOTS_PER_MPS))
}

/// Wind speed expressed as (m/s, mph, knots), each rounded to whole units
pub fn wind_speed_triplet(
    speed: Option<WindSpeed>,
) -> (Option<f64>, Option<f64>, Option<f64>) {
    let Some(speed) = speed.filter(|s| s.value.is_finite()) else {
        return (None, None, None);
    };
    let value = Some(speed.value);

    match speed.unit {
        SpeedUnit::MetersPerSecond => (round_whole(value), mps_to_mph(value), mps_to_kts(value)),
        SpeedUnit::Knots => (kts_to_mps(value), kts_to_mph(value), round_whole(value)),
        SpeedUnit::MilesPerHour => (mph_to_mps(value), round_whole(value), mph_to_kts(value)),
    }
}

// =============================================================================
// Direction
// =============================================================================

/// Map a bearing in degrees onto the 16-point compass rose
pub fn deg_to_compass(degrees: Option<f64>) -> Option<&'static str> {
    let degrees = finite(degrees)?;
    let index = (degrees / DEGREES_PER_COMPASS_POINT + 0.5).floor() as i64;
    Some(COMPASS_POINTS[index.rem_euclid(16) as usize])
}

// =============================================================================
// Record Assembly
// =============================================================================

/// Build the normalized output record from resolved measurements
pub fn normalize(measurements: &Measurements, timestamp: DateTime<Utc>) -> NormalizedRecord {
    let water_c = round_tenth(measurements.water_c);
    let wave_m = round_tenth(measurements.wave_m);
    let (wind_mps, wind_mph, wind_kts) = wind_speed_triplet(measurements.wind_speed);
    let wind_dir_deg = round_whole(measurements.wind_dir_deg);

    NormalizedRecord {
        sst_c: water_c,
        wave_m,
        ts: timestamp.timestamp_millis(),
        air_c: round_tenth(measurements.air_c),
        air_f: c_to_f(measurements.air_c),
        water_c,
        water_f: c_to_f(measurements.water_c),
        wave_ft: m_to_ft(measurements.wave_m),
        wind_mps,
        wind_mph,
        wind_kts,
        wind_dir_deg,
        wind_dir_compass: deg_to_compass(measurements.wind_dir_deg).map(str::to_string),
    }
}
