//! Service configuration.
//!
//! Loaded from a TOML file; every field has a default so an empty (or
//! absent) file yields a working synthetic-data setup. The NOAA token is
//! normally kept out of the file and supplied through `NOAA_TOKEN`, which
//! `load_config` reads from the environment or a `.env` file.
//!
//! ```toml
//! [noaa]
//! use_live_api = true
//! location_id = "CITY:US000001"
//!
//! [analysis]
//! window_size = 12
//! anomaly_threshold = 2.0
//!
//! [logging]
//! level = "debug"
//! file = "climon.log"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::analysis::{DEFAULT_ANOMALY_THRESHOLD, DEFAULT_FORECAST_DAYS, DEFAULT_WINDOW_SIZE, PeriodSpec};
use crate::ingest::noaa::CDO_BASE_URL;
use crate::logging::LogLevel;

/// Environment variable that overrides `noaa.token`.
pub const TOKEN_ENV_VAR: &str = "NOAA_TOKEN";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NoaaConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub dataset_id: String,
    pub location_id: String,
    pub data_type_id: String,
    pub limit: u32,
    pub timeout_secs: u64,
    /// Fetch from NOAA instead of generating synthetic data. Ignored when
    /// no token is available.
    pub use_live_api: bool,
}

impl Default for NoaaConfig {
    fn default() -> Self {
        NoaaConfig {
            base_url: CDO_BASE_URL.to_string(),
            token: None,
            dataset_id: "GHCND".to_string(),
            location_id: "CITY:US000001".to_string(),
            data_type_id: "TAVG".to_string(),
            limit: 1000,
            timeout_secs: 30,
            use_live_api: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub window_size: usize,
    pub anomaly_threshold: f64,
    pub forecast_days: usize,
    /// Half-width of the display band drawn around forecasts.
    pub envelope_fraction: f64,
    pub periods: Vec<PeriodSpec>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            window_size: DEFAULT_WINDOW_SIZE,
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
            forecast_days: DEFAULT_FORECAST_DAYS,
            envelope_fraction: 0.10,
            periods: PeriodSpec::defaults(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl LoggingConfig {
    pub fn min_level(&self) -> Result<LogLevel, ConfigError> {
        self.level.parse().map_err(ConfigError::Invalid)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub noaa: NoaaConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    Io(std::io::Error),
    /// The file is not valid TOML for this schema.
    Parse(String),
    /// A value is out of range.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config: {}", e),
            ConfigError::Parse(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.window_size == 0 {
            return Err(ConfigError::Invalid("analysis.window_size must be at least 1".into()));
        }
        if !(self.analysis.anomaly_threshold > 0.0) {
            return Err(ConfigError::Invalid("analysis.anomaly_threshold must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.analysis.envelope_fraction) {
            return Err(ConfigError::Invalid("analysis.envelope_fraction must be in [0, 1)".into()));
        }
        if !self.noaa.base_url.starts_with("http://") && !self.noaa.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "noaa.base_url must be an http(s) URL, got '{}'",
                self.noaa.base_url
            )));
        }
        if let Some(info) = crate::datatypes::find_data_type(&self.noaa.data_type_id) {
            if !info.available_live {
                return Err(ConfigError::Invalid(format!(
                    "noaa.data_type_id '{}' is synthetic-only and cannot be fetched live",
                    info.code
                )));
            }
        }
        self.logging.min_level()?;
        Ok(())
    }

    /// Applies a token from the environment, if one is set and non-empty.
    pub fn with_token(mut self, token: Option<String>) -> Config {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.noaa.token = Some(token);
        }
        self
    }

    /// True when live NOAA data should be fetched.
    pub fn live_api_enabled(&self) -> bool {
        self.noaa.use_live_api && self.noaa.token.is_some()
    }
}

/// Loads configuration from `path` (defaults when the file does not exist),
/// then applies `NOAA_TOKEN` from the environment or `.env`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    dotenv::dotenv().ok();

    let config = if path.exists() {
        let contents = fs::read_to_string(path)?;
        Config::from_toml_str(&contents)?
    } else {
        Config::default()
    };

    Ok(config.with_token(std::env::var(TOKEN_ENV_VAR).ok()))
}
