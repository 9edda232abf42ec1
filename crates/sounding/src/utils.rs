use anyhow::{anyhow, Error};
use clap::Parser;
use reqwest::Client;
use slog::{debug, o, warn, Drain, Level, Logger};
use sounding_core::{
    find_config_file, load_config, ConfigSource, CONFIG_ENV_VAR, CONFIG_FILE_NAME,
    DEFAULT_API_BASE_URL, DEFAULT_CACHE_FILE, DEFAULT_TOKEN_FILE,
};
use std::{env, time::Duration};

use crate::{Bounds, Glyphs, ReportOptions, XAxis, YAxis};

/// Pressure window used for pressure axes unless overridden.
pub const DEFAULT_PRESSURE_BOUNDS: (f64, f64) = (850.0, 1025.0);

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[serde(default)]
#[command(
    author,
    version,
    about = "Synoptic Sounding - grabs data from weather stations and plots it as an ASCII sounding"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $SOUNDING_CONFIG, ./sounding.toml,
    /// $XDG_CONFIG_HOME/synoptic-sounding/sounding.toml, /etc/synoptic-sounding/sounding.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "SOUNDING_LEVEL")]
    pub level: Option<String>,

    /// Latitude, longitude and radius in miles ("lat,lon,miles"), passed straight to Synoptic
    #[arg(short, long, env = "SOUNDING_RADIUS", allow_hyphen_values = true)]
    pub radius: Option<String>,

    /// Width and height of the sounding display
    #[arg(short, long, alias = "dims", num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    pub size: Option<Vec<usize>>,

    /// Value plotted on the Y axis
    #[arg(short, long, value_enum, env = "SOUNDING_PRODUCT")]
    pub product: Option<YAxis>,

    /// Value plotted on the X axis
    #[arg(short, long, value_enum, env = "SOUNDING_XKEY")]
    pub xkey: Option<XAxis>,

    /// Read stations from a saved JSON file instead of the live API.
    /// Without a path the last fetched result is used.
    #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_CACHE_FILE)]
    #[serde(skip)]
    pub file: Option<String>,

    /// Lower Y axis bound (default 850 mb for pressure axes)
    #[arg(long, alias = "pres-lower", allow_negative_numbers = true)]
    pub y_lower: Option<f64>,

    /// Upper Y axis bound (default 1025 mb for pressure axes)
    #[arg(long, alias = "pres-upper", allow_negative_numbers = true)]
    pub y_upper: Option<f64>,

    /// Lower X axis bound
    #[arg(long, alias = "temp-lower", allow_negative_numbers = true)]
    pub x_lower: Option<f64>,

    /// Upper X axis bound
    #[arg(long, alias = "temp-upper", allow_negative_numbers = true)]
    pub x_upper: Option<f64>,

    /// Maximum age of current observations, in minutes
    #[arg(long, env = "SOUNDING_WITHIN")]
    pub within: Option<u32>,

    /// Only request the variables the current display needs
    #[arg(long)]
    pub slim: bool,

    /// Require every requested variable to be present (use with --slim)
    #[arg(long)]
    pub all_params: bool,

    /// Request wind speed and gust as well; limits stations
    #[arg(long)]
    pub enable_wind: bool,

    /// Four display characters: start/stop, range, data, mean
    #[arg(short, long, env = "SOUNDING_GLYPHS")]
    pub glyphs: Option<String>,

    /// File holding the Synoptic API token
    #[arg(short, long, env = "SOUNDING_TOKEN_FILE")]
    pub token: Option<String>,

    /// Do not print the sounding display
    #[arg(long)]
    pub no_viz: bool,

    /// Write the chart summary to this JSON file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Where live responses are cached
    #[arg(long, env = "SOUNDING_CACHE_FILE")]
    pub cache_file: Option<String>,

    /// Synoptic API root
    #[arg(long, env = "SOUNDING_BASE_URL")]
    pub base_url: Option<String>,

    /// HTTP User-Agent header for Synoptic API requests
    #[arg(short, long, env = "SOUNDING_USER_AGENT")]
    pub user_agent: Option<String>,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn width(&self) -> usize {
        self.size.as_ref().and_then(|s| s.first().copied()).unwrap_or(66)
    }

    pub fn height(&self) -> usize {
        self.size.as_ref().and_then(|s| s.get(1).copied()).unwrap_or(16)
    }

    pub fn y_axis(&self) -> YAxis {
        self.product.unwrap_or_default()
    }

    pub fn x_axis(&self) -> XAxis {
        self.xkey.unwrap_or_default()
    }

    /// Pressure axes fall back to `DEFAULT_PRESSURE_BOUNDS`; elevation axes are unbounded.
    pub fn y_bounds(&self) -> Bounds {
        if self.y_axis().is_elevation() {
            Bounds::new(self.y_lower, self.y_upper)
        } else {
            let (lower, upper) = DEFAULT_PRESSURE_BOUNDS;
            Bounds::new(
                Some(self.y_lower.unwrap_or(lower)),
                Some(self.y_upper.unwrap_or(upper)),
            )
        }
    }

    pub fn x_bounds(&self) -> Bounds {
        Bounds::new(self.x_lower, self.x_upper)
    }

    pub fn within(&self) -> u32 {
        self.within.unwrap_or(15)
    }

    /// Invalid glyph sets are reported and replaced by the default set.
    pub fn glyphs(&self, logger: &Logger) -> Glyphs {
        match self.glyphs.as_deref().map(str::parse::<Glyphs>) {
            Some(Ok(glyphs)) => glyphs,
            Some(Err(e)) => {
                warn!(logger, "ignoring glyph set: {}", e);
                Glyphs::default()
            }
            None => Glyphs::default(),
        }
    }

    pub fn token_file(&self) -> String {
        self.token
            .clone()
            .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string())
    }

    pub fn cache_file(&self) -> String {
        self.cache_file
            .clone()
            .unwrap_or_else(|| DEFAULT_CACHE_FILE.to_string())
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("synoptic-sounding/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn report_options(&self, logger: &Logger) -> ReportOptions {
        ReportOptions {
            width: self.width(),
            height: self.height(),
            y_axis: self.y_axis(),
            x_axis: self.x_axis(),
            y_bounds: self.y_bounds(),
            x_bounds: self.x_bounds(),
            glyphs: self.glyphs(logger),
        }
    }

    /// Fill every unset field from `file_config`; fields set here win.
    pub fn merge(self, file_config: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file_config.level),
            radius: self.radius.or(file_config.radius),
            size: self.size.or(file_config.size),
            product: self.product.or(file_config.product),
            xkey: self.xkey.or(file_config.xkey),
            file: self.file,
            y_lower: self.y_lower.or(file_config.y_lower),
            y_upper: self.y_upper.or(file_config.y_upper),
            x_lower: self.x_lower.or(file_config.x_lower),
            x_upper: self.x_upper.or(file_config.x_upper),
            within: self.within.or(file_config.within),
            slim: self.slim || file_config.slim,
            all_params: self.all_params || file_config.all_params,
            enable_wind: self.enable_wind || file_config.enable_wind,
            glyphs: self.glyphs.or(file_config.glyphs),
            token: self.token.or(file_config.token),
            no_viz: self.no_viz || file_config.no_viz,
            output: self.output.or(file_config.output),
            cache_file: self.cache_file.or(file_config.cache_file),
            base_url: self.base_url.or(file_config.base_url),
            user_agent: self.user_agent.or(file_config.user_agent),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    let cli_args = Cli::parse();

    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file(CONFIG_ENV_VAR, CONFIG_FILE_NAME)
    };

    let file_config: Cli = match load_config(&source) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ignoring config file {}: {:#}", source, e);
            Cli::default()
        }
    };

    // CLI args override file config (env vars are handled by clap)
    cli_args.merge(file_config)
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "info" => Level::Info,
        "warn" => Level::Warning,
        "error" => Level::Error,
        _ => Level::Info,
    }
}

pub fn setup_logger(cli: &Cli) -> Logger {
    let log_level = match cli.level.as_ref() {
        Some(level) => parse_level(level),
        None => parse_level(&env::var("RUST_LOG").unwrap_or_default()),
    };

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(log_level).fuse();
    slog::Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}

pub struct JsonFetcher {
    logger: Logger,
    user_agent: String,
    timeout: Duration,
}

impl JsonFetcher {
    pub fn new(logger: Logger, user_agent: String) -> JsonFetcher {
        Self {
            logger,
            user_agent,
            timeout: Duration::from_secs(30),
        }
    }

    /// GET `url` with `params` and return the body; any non-2xx status is an error.
    pub async fn fetch_text(&self, url: &str, params: &[(String, String)]) -> Result<String, Error> {
        let client = Client::builder().user_agent(&self.user_agent).build()?;

        debug!(self.logger, "requesting: {}", url);
        let response = client
            .get(url)
            .query(params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| anyhow!("error sending request: {}", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("error response from request: {}", status));
        }
        response
            .text()
            .await
            .map_err(|e| anyhow!("error parsing body of request: {}", e))
    }
}
