use anyhow::{anyhow, Error};
use serde_json::Value;
use slog::{debug, info, warn, Logger};

use super::{Attribute, StationRecord};

/// Every station parsed from one Synoptic `stations/latest` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationCollection {
    stations: Vec<StationRecord>,
}

impl StationCollection {
    pub fn new(stations: Vec<StationRecord>) -> Self {
        StationCollection { stations }
    }

    /// Builds a collection from a `{ "STATION": [...] }` document.
    ///
    /// Records that fail to parse are logged and skipped; only a document
    /// without a `STATION` array is an error.
    pub fn from_document(document: &Value, logger: &Logger) -> Result<Self, Error> {
        let raw_stations = document
            .get("STATION")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("response did not contain a STATION array"))?;

        let mut stations = Vec::with_capacity(raw_stations.len());
        let mut skipped = 0;
        for (index, raw) in raw_stations.iter().enumerate() {
            match StationRecord::try_from(raw) {
                Ok(station) => {
                    let missing = station.missing_sensors();
                    if !missing.is_empty() {
                        debug!(logger, "station {} lacks sensors: {:?}", station.station_id, missing);
                    }
                    stations.push(station);
                }
                Err(e) => {
                    skipped += 1;
                    let stid = raw.get("STID").and_then(Value::as_str).unwrap_or("?");
                    warn!(logger, "skipping station #{} ({}): {}", index, stid, e);
                }
            }
        }

        info!(
            logger,
            "parsed {} stations, skipped {}",
            stations.len(),
            skipped
        );
        Ok(StationCollection { stations })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[StationRecord] {
        &self.stations
    }

    /// Drops every station lacking `attribute`; returns how many were removed.
    pub fn prune(&mut self, attribute: Attribute) -> usize {
        let before = self.stations.len();
        self.stations.retain(|s| attribute.value(s).is_some());
        before - self.stations.len()
    }

    /// `(max, min)` of `attribute` over stations that report it.
    pub fn attribute_range(&self, attribute: Attribute) -> Option<(f64, f64)> {
        extremes(&self.stations, attribute).map(|(min, max)| (max, min))
    }

    /// `(min, max)` of `attribute` over stations that report it.
    pub fn temperature_range(&self, attribute: Attribute) -> Option<(f64, f64)> {
        extremes(&self.stations, attribute)
    }
}

/// `(min, max)` of `attribute` across `stations`, ignoring absent values.
pub fn extremes<'a, I>(stations: I, attribute: Attribute) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a StationRecord>,
{
    stations
        .into_iter()
        .filter_map(|s| attribute.value(s))
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}
