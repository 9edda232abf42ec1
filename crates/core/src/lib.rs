//! Synoptic Sounding Core Library
//!
//! Shared utilities for the sounding binary:
//! - Configuration loading (XDG-compliant)
//! - File system utilities
//! - Common constants

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::{create_parent_dirs, read_first_line, write_snapshot};

/// Application name used for XDG paths
pub const APP_NAME: &str = "synoptic-sounding";

/// Config file name searched in the standard locations
pub const CONFIG_FILE_NAME: &str = "sounding.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SOUNDING_CONFIG";

/// Default location of the last fetched station snapshot
pub const DEFAULT_CACHE_FILE: &str = "last_result.json";

/// Default Synoptic token file
pub const DEFAULT_TOKEN_FILE: &str = "api.apikey";

/// File holding the default `lat,lon,miles` search radius
pub const DEFAULT_RADIUS_FILE: &str = "default_radius.txt";

/// Synoptic Data REST API root
pub const DEFAULT_API_BASE_URL: &str = "https://api.synopticdata.com/v2";
