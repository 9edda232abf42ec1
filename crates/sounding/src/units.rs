//! Barometric approximations between station elevation and pressure.
//!
//! `altitude_to_pressure` and `pressure_to_altitude` use independently fitted
//! exponents, so they are not exact inverses of each other. A round trip
//! drifts by a few centimetres at typical station heights.

/// Standard sea-level pressure in millibars.
pub const STANDARD_SEA_LEVEL_MB: f64 = 1013.25;

pub const FEET_TO_METERS: f64 = 0.3048;

const SCALE_HEIGHT_M: f64 = 44307.69396;
const PRESSURE_EXPONENT: f64 = 5.2553026;
const ALTITUDE_EXPONENT: f64 = 0.190284;

/// Expected station pressure (mb) at `elevation_m` meters.
pub fn altitude_to_pressure(elevation_m: f64, sea_level_mb: f64) -> f64 {
    sea_level_mb * (1.0 - elevation_m / SCALE_HEIGHT_M).powf(PRESSURE_EXPONENT)
}

/// Expected altitude (m) for a station pressure of `pressure_mb`.
pub fn pressure_to_altitude(pressure_mb: f64, sea_level_mb: f64) -> f64 {
    (1.0 - (pressure_mb / sea_level_mb).powf(ALTITUDE_EXPONENT)) * SCALE_HEIGHT_M
}

pub fn feet_to_meters(feet: f64) -> f64 {
    feet * FEET_TO_METERS
}
