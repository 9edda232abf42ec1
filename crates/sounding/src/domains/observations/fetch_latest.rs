use anyhow::{anyhow, Context, Error};
use serde_json::Value;
use slog::{info, warn, Logger};
use sounding_core::{read_first_line, write_snapshot};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error as ThisError;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{
    JsonFetcher, XAxis, YAxis, SENSOR_AIR_TEMP, SENSOR_DEW_POINT, SENSOR_PRESSURE,
    SENSOR_WIND_GUST, SENSOR_WIND_SPEED,
};

/// Synoptic tokens are 32 characters; shorter ones are left-padded with zeros.
pub const TOKEN_LENGTH: usize = 32;

const DEFAULT_VARS: [&str; 3] = [SENSOR_AIR_TEMP, SENSOR_DEW_POINT, SENSOR_PRESSURE];
const WIND_VARS: [&str; 2] = [SENSOR_WIND_SPEED, SENSOR_WIND_GUST];

#[derive(Debug, ThisError, PartialEq)]
pub enum RadiusError {
    #[error("radius needs lat,lon,miles but got {0} values")]
    WrongArity(usize),
    #[error("radius component {0:?} is not a number")]
    NotANumber(String),
}

/// Circular station search area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radius {
    pub latitude: f64,
    pub longitude: f64,
    pub miles: f64,
}

impl FromStr for Radius {
    type Err = RadiusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(RadiusError::WrongArity(parts.len()));
        }
        let mut values = [0.0; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f64>()
                .map_err(|_| RadiusError::NotANumber(part.to_string()))?;
        }
        let [latitude, longitude, miles] = values;
        Ok(Radius {
            latitude,
            longitude,
            miles,
        })
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.latitude, self.longitude, self.miles)
    }
}

impl Radius {
    /// Reads a `lat,lon,miles` line such as the one in `default_radius.txt`.
    pub fn from_file(path: &Path) -> Result<Radius, Error> {
        let line = read_first_line(path)
            .with_context(|| format!("reading radius file {}", path.display()))?;
        Ok(line.parse()?)
    }
}

/// Parameters for one `stations/latest` request.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestQuery {
    pub radius: Radius,
    pub vars: Vec<&'static str>,
    pub need_all_vars: bool,
    pub enable_wind: bool,
    /// Skip variable preselection entirely (large responses)
    pub all_stations: bool,
    pub within_minutes: u32,
}

impl LatestQuery {
    pub fn query_params(&self, token: &str) -> Vec<(String, String)> {
        let mut vars: Vec<&str> = if self.vars.is_empty() || self.need_all_vars {
            DEFAULT_VARS.to_vec()
        } else {
            self.vars.clone()
        };
        if self.enable_wind {
            for var in WIND_VARS {
                if !vars.contains(&var) {
                    vars.push(var);
                }
            }
        }

        let mut params = Vec::with_capacity(6);
        if !self.all_stations {
            params.push(("vars".to_string(), vars.join(",")));
            let operator = if self.need_all_vars { "and" } else { "or" };
            params.push(("varsoperator".to_string(), operator.to_string()));
        }
        params.push(("token".to_string(), token.to_string()));
        params.push(("radius".to_string(), self.radius.to_string()));
        params.push(("status".to_string(), "active".to_string()));
        params.push(("within".to_string(), self.within_minutes.to_string()));
        params
    }
}

/// Sensor variables a chart of `y_axis` against `x_axis` cannot do without.
pub fn required_vars(y_axis: YAxis, x_axis: XAxis) -> Vec<&'static str> {
    let mut vars = vec![x_axis.sensor_variable()];
    if let Some(var) = y_axis.sensor_variable() {
        vars.push(var);
    }
    vars
}

/// Reads the API token from the first line of `path`.
pub fn load_api_token(path: &Path) -> Result<String, Error> {
    if !path.exists() {
        return Err(anyhow!("token file not found: {}", path.display()));
    }
    let key = read_first_line(path)?;
    Ok(format!("{:0>width$}", key.trim(), width = TOKEN_LENGTH))
}

/// Fetches the latest station observations or loads a cached snapshot of them.
pub struct SynopticGateway {
    pub logger: Logger,
    pub fetcher: JsonFetcher,
    pub base_url: String,
    pub cache_file: PathBuf,
}

impl SynopticGateway {
    pub fn new(logger: Logger, fetcher: JsonFetcher, base_url: String, cache_file: PathBuf) -> Self {
        SynopticGateway {
            logger,
            fetcher,
            base_url,
            cache_file,
        }
    }

    /// Requests the latest observations and caches the raw response before parsing it.
    pub async fn fetch_latest(&self, query: &LatestQuery, token: &str) -> Result<Value, Error> {
        let url = format!("{}/stations/latest", self.base_url.trim_end_matches('/'));
        info!(
            self.logger,
            "fetching stations within {} of {},{}",
            query.radius.miles,
            query.radius.latitude,
            query.radius.longitude
        );
        let body = self
            .fetcher
            .fetch_text(&url, &query.query_params(token))
            .await?;

        write_snapshot(&self.cache_file, body.as_bytes())
            .with_context(|| format!("caching response to {}", self.cache_file.display()))?;
        info!(self.logger, "cached response to {}", self.cache_file.display());

        serde_json::from_str(&body).map_err(|e| anyhow!("error parsing station response: {}", e))
    }

    /// Loads a previously cached (possibly stale) response.
    pub fn load_file(&self, path: &Path) -> Result<Value, Error> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading station file {}", path.display()))?;

        match snapshot_time(path) {
            Ok(taken) => {
                let age = OffsetDateTime::now_utc() - taken;
                let stamp = taken.format(&Rfc3339).unwrap_or_else(|_| taken.to_string());
                info!(
                    self.logger,
                    "loaded {} from {} ({} minutes old)",
                    path.display(),
                    stamp,
                    age.whole_minutes()
                );
            }
            Err(e) => warn!(self.logger, "could not date {}: {}", path.display(), e),
        }

        serde_json::from_str(&contents)
            .map_err(|e| anyhow!("error parsing station file {}: {}", path.display(), e))
    }
}

fn snapshot_time(path: &Path) -> std::io::Result<OffsetDateTime> {
    Ok(OffsetDateTime::from(fs::metadata(path)?.modified()?))
}
