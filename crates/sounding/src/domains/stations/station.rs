use serde_json::{Map, Value};
use thiserror::Error;

use crate::units::{altitude_to_pressure, feet_to_meters, STANDARD_SEA_LEVEL_MB};

pub const SENSOR_AIR_TEMP: &str = "air_temp";
pub const SENSOR_DEW_POINT: &str = "dew_point_temperature";
pub const SENSOR_PRESSURE: &str = "pressure";
pub const SENSOR_WIND_SPEED: &str = "wind_speed";
pub const SENSOR_WIND_GUST: &str = "wind_gust";

pub const SENSOR_CATEGORIES: [&str; 5] = [
    SENSOR_AIR_TEMP,
    SENSOR_DEW_POINT,
    SENSOR_PRESSURE,
    SENSOR_WIND_SPEED,
    SENSOR_WIND_GUST,
];

/// Synoptic reports station pressure in pascals.
const PASCALS_PER_MILLIBAR: f64 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum StationError {
    #[error("station record is not a JSON object")]
    NotAnObject,
    #[error("station record is missing {0}")]
    MissingField(&'static str),
    #[error("station field {field} has unusable value {value}")]
    InvalidField { field: &'static str, value: String },
}

/// One station's latest observations, normalized to metric units.
///
/// Optional fields are `None` when the provider did not report that sensor
/// (or reported something that is not a finite number).
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub station_id: String,
    pub internal_id: String,
    /// (latitude, longitude)
    pub position: (f64, f64),
    pub elevation_m: Option<f64>,
    /// Falls back to `elevation_m` when the provider has no DEM elevation.
    pub elevation_dem_m: Option<f64>,
    pub pressure_uncorrected_mb: Option<f64>,
    pub pressure_uncorrected_dem_mb: Option<f64>,
    pub temperature_c: Option<f64>,
    pub dew_point_c: Option<f64>,
    pub pressure_mb: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub qc_flagged: bool,
}

impl StationRecord {
    /// Sensor categories this station did not report.
    pub fn missing_sensors(&self) -> Vec<&'static str> {
        [
            (SENSOR_AIR_TEMP, self.temperature_c),
            (SENSOR_DEW_POINT, self.dew_point_c),
            (SENSOR_PRESSURE, self.pressure_mb),
            (SENSOR_WIND_SPEED, self.wind_speed),
            (SENSOR_WIND_GUST, self.wind_gust),
        ]
        .into_iter()
        .filter_map(|(category, value)| value.is_none().then_some(category))
        .collect()
    }
}

impl TryFrom<&Value> for StationRecord {
    type Error = StationError;

    fn try_from(raw: &Value) -> Result<Self, Self::Error> {
        let raw = raw.as_object().ok_or(StationError::NotAnObject)?;

        let internal_id = identifier(raw, "ID")?;
        let station_id = identifier(raw, "STID")?;
        let latitude = coordinate(raw, "LATITUDE")?;
        let longitude = coordinate(raw, "LONGITUDE")?;
        let qc_flagged = match required(raw, "QC_FLAGGED")? {
            Value::Bool(flag) => *flag,
            other => {
                return Err(StationError::InvalidField {
                    field: "QC_FLAGGED",
                    value: other.to_string(),
                })
            }
        };

        let elevation_m = raw.get("ELEVATION").and_then(number).map(feet_to_meters);
        let elevation_dem_m = raw
            .get("ELEV_DEM")
            .and_then(number)
            .map(feet_to_meters)
            .or(elevation_m);

        Ok(StationRecord {
            station_id,
            internal_id,
            position: (latitude, longitude),
            elevation_m,
            elevation_dem_m,
            pressure_uncorrected_mb: elevation_m.and_then(derived_pressure),
            pressure_uncorrected_dem_mb: elevation_dem_m.and_then(derived_pressure),
            temperature_c: sensor_value(raw, SENSOR_AIR_TEMP),
            dew_point_c: sensor_value(raw, SENSOR_DEW_POINT),
            pressure_mb: sensor_value(raw, SENSOR_PRESSURE).map(|pa| pa / PASCALS_PER_MILLIBAR),
            wind_speed: sensor_value(raw, SENSOR_WIND_SPEED),
            wind_gust: sensor_value(raw, SENSOR_WIND_GUST),
            qc_flagged,
        })
    }
}

fn required<'a>(raw: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, StationError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(StationError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

fn identifier(raw: &Map<String, Value>, field: &'static str) -> Result<String, StationError> {
    match required(raw, field)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(StationError::InvalidField {
            field,
            value: other.to_string(),
        }),
    }
}

fn coordinate(raw: &Map<String, Value>, field: &'static str) -> Result<f64, StationError> {
    let value = required(raw, field)?;
    number(value).ok_or_else(|| StationError::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// Accepts JSON numbers and numeric strings; anything non-finite is absent.
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn derived_pressure(elevation_m: f64) -> Option<f64> {
    Some(altitude_to_pressure(elevation_m, STANDARD_SEA_LEVEL_MB)).filter(|p| p.is_finite())
}

/// Value of the first reported instance of a sensor category.
fn sensor_value(raw: &Map<String, Value>, category: &str) -> Option<f64> {
    let instance = raw
        .get("SENSOR_VARIABLES")?
        .get(category)?
        .as_object()?
        .keys()
        .next()?;
    let observation = raw.get("OBSERVATIONS")?.get(instance)?.get("value")?;
    number(observation)
}
