use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::StationRecord;

#[derive(Debug, Error, PartialEq)]
#[error("unknown {kind} key: {key}")]
pub struct AxisParseError {
    pub kind: &'static str,
    pub key: String,
}

/// Every numeric measurement a station record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Elevation,
    ElevationDem,
    PressureUncorrected,
    PressureUncorrectedDem,
    Temperature,
    DewPoint,
    Pressure,
    WindSpeed,
    WindGust,
}

impl Attribute {
    pub const ALL: [Attribute; 9] = [
        Attribute::Elevation,
        Attribute::ElevationDem,
        Attribute::PressureUncorrected,
        Attribute::PressureUncorrectedDem,
        Attribute::Temperature,
        Attribute::DewPoint,
        Attribute::Pressure,
        Attribute::WindSpeed,
        Attribute::WindGust,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Elevation => "elevation",
            Attribute::ElevationDem => "elevation_dem",
            Attribute::PressureUncorrected => "pres_uc",
            Attribute::PressureUncorrectedDem => "pres_uc_dem",
            Attribute::Temperature => "temp",
            Attribute::DewPoint => "dewp",
            Attribute::Pressure => "pres",
            Attribute::WindSpeed => "wind",
            Attribute::WindGust => "gust",
        }
    }

    pub fn value(&self, station: &StationRecord) -> Option<f64> {
        match self {
            Attribute::Elevation => station.elevation_m,
            Attribute::ElevationDem => station.elevation_dem_m,
            Attribute::PressureUncorrected => station.pressure_uncorrected_mb,
            Attribute::PressureUncorrectedDem => station.pressure_uncorrected_dem_mb,
            Attribute::Temperature => station.temperature_c,
            Attribute::DewPoint => station.dew_point_c,
            Attribute::Pressure => station.pressure_mb,
            Attribute::WindSpeed => station.wind_speed,
            Attribute::WindGust => station.wind_gust,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Attribute {
    type Err = AxisParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.key() == s)
            .ok_or_else(|| AxisParseError {
                kind: "attribute",
                key: s.to_string(),
            })
    }
}

/// Vertical axis of a sounding chart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum YAxis {
    /// Observed station pressure
    #[serde(rename = "pres")]
    #[value(name = "pres")]
    Pressure,
    /// Pressure derived from station elevation
    #[default]
    #[serde(rename = "pres_uc")]
    #[value(name = "pres_uc")]
    PressureUncorrected,
    #[serde(rename = "elevation")]
    #[value(name = "elevation")]
    Elevation,
    #[serde(rename = "elevation_dem")]
    #[value(name = "elevation_dem")]
    ElevationDem,
}

impl YAxis {
    pub fn attribute(&self) -> Attribute {
        match self {
            YAxis::Pressure => Attribute::Pressure,
            YAxis::PressureUncorrected => Attribute::PressureUncorrected,
            YAxis::Elevation => Attribute::Elevation,
            YAxis::ElevationDem => Attribute::ElevationDem,
        }
    }

    /// Elevation axes grow upward; pressure axes shrink upward.
    pub fn is_elevation(&self) -> bool {
        matches!(self, YAxis::Elevation | YAxis::ElevationDem)
    }

    /// Provider sensor variable backing this axis, if it is observed rather than derived.
    pub fn sensor_variable(&self) -> Option<&'static str> {
        match self {
            YAxis::Pressure => Some("pressure"),
            _ => None,
        }
    }
}

impl fmt::Display for YAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute().key())
    }
}

impl FromStr for YAxis {
    type Err = AxisParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pres" => Ok(YAxis::Pressure),
            "pres_uc" => Ok(YAxis::PressureUncorrected),
            "elevation" => Ok(YAxis::Elevation),
            "elevation_dem" => Ok(YAxis::ElevationDem),
            _ => Err(AxisParseError {
                kind: "y-axis",
                key: s.to_string(),
            }),
        }
    }
}

/// Horizontal axis of a sounding chart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum XAxis {
    #[default]
    #[serde(rename = "temp")]
    #[value(name = "temp")]
    Temperature,
    #[serde(rename = "dewp")]
    #[value(name = "dewp")]
    DewPoint,
    #[serde(rename = "wind")]
    #[value(name = "wind")]
    WindSpeed,
    #[serde(rename = "gust")]
    #[value(name = "gust")]
    WindGust,
}

impl XAxis {
    pub fn attribute(&self) -> Attribute {
        match self {
            XAxis::Temperature => Attribute::Temperature,
            XAxis::DewPoint => Attribute::DewPoint,
            XAxis::WindSpeed => Attribute::WindSpeed,
            XAxis::WindGust => Attribute::WindGust,
        }
    }

    pub fn sensor_variable(&self) -> &'static str {
        match self {
            XAxis::Temperature => "air_temp",
            XAxis::DewPoint => "dew_point_temperature",
            XAxis::WindSpeed => "wind_speed",
            XAxis::WindGust => "wind_gust",
        }
    }
}

impl fmt::Display for XAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute().key())
    }
}

impl FromStr for XAxis {
    type Err = AxisParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temp" => Ok(XAxis::Temperature),
            "dewp" => Ok(XAxis::DewPoint),
            "wind" => Ok(XAxis::WindSpeed),
            "gust" => Ok(XAxis::WindGust),
            _ => Err(AxisParseError {
                kind: "x-axis",
                key: s.to_string(),
            }),
        }
    }
}
