//! Configuration management for the Zero factor tools.
//!
//! All tools share a configuration file at `~/.codecoder/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Command-line flags (applied by the binaries)
//! 2. Environment variables (ZERO_* prefix)
//! 3. Explicit config file values
//! 4. Default values
//!
//! # Environment Variable Mapping
//!
//! - `ZERO_LOG_LEVEL` → observability.log_level
//! - `ZERO_LOG_FORMAT` → observability.log_format
//! - `ZERO_FACTOR_SYMBOL` → factor.symbol
//! - `ZERO_FACTOR_HORIZON` → factor.horizon
//! - `ZERO_FACTOR_LOOKBACK_DAYS` → factor.lookback_days

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".codecoder"),
        |dirs| dirs.home_dir().join(".codecoder"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// JSON Schema reference
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Factor evaluation parameters
    #[serde(default)]
    pub factor: FactorConfig,

    /// Market data source settings
    #[serde(default, alias = "data_sources")]
    pub data_source: DataSourceConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("ZERO_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(format) = std::env::var("ZERO_LOG_FORMAT") {
            self.observability.log_format = format;
        }

        if let Ok(symbol) = std::env::var("ZERO_FACTOR_SYMBOL") {
            if !symbol.trim().is_empty() {
                self.factor.symbol = symbol.trim().to_string();
            }
        }
        if let Ok(horizon) = std::env::var("ZERO_FACTOR_HORIZON") {
            if let Ok(h) = horizon.parse() {
                self.factor.horizon = h;
            }
        }
        if let Ok(days) = std::env::var("ZERO_FACTOR_LOOKBACK_DAYS") {
            if let Ok(d) = days.parse() {
                self.factor.lookback_days = d;
            }
        }
    }

    /// Save configuration to the given path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create config directory {}", dir.display())
                })?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Aliases: "level" for backward compatibility with existing config files
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    /// Aliases: "format" for backward compatibility with existing config files
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets to hold at `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

// ============================================================================
// Factor Configuration
// ============================================================================

/// Parameters for the rank-volume correlation factor and its IC evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorConfig {
    /// Instrument evaluated when none is given on the command line
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Calendar days of history to fetch, counted back from the end date
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Window for the rolling rank of open and volume
    #[serde(default = "default_window")]
    pub rank_window: usize,

    /// Window for the rolling correlation of the two ranks
    #[serde(default = "default_window")]
    pub corr_window: usize,

    /// Forward return horizon in trading days
    #[serde(default = "default_horizon")]
    pub horizon: usize,

    /// Minimum paired observations for a correlation (whole sample or month)
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    /// Minimum monthly ICs before dispersion statistics are reported
    #[serde(default = "default_min_months")]
    pub min_months: usize,

    /// Moving-average windows prepared for the candlestick chart
    #[serde(default = "default_ma_windows")]
    pub ma_windows: Vec<usize>,

    /// Two-tailed significance level used when labelling the t-test
    #[serde(default = "default_significance_level")]
    pub significance_level: f64,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            lookback_days: default_lookback_days(),
            rank_window: default_window(),
            corr_window: default_window(),
            horizon: default_horizon(),
            min_samples: default_min_samples(),
            min_months: default_min_months(),
            ma_windows: default_ma_windows(),
            significance_level: default_significance_level(),
        }
    }
}

// ============================================================================
// Data Source Configuration
// ============================================================================

/// Market data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Provider name ("eastmoney")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Price adjustment: "qfq" (前复权), "hfq" (后复权) or "none"
    #[serde(default = "default_adjust")]
    pub adjust: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Override for the kline endpoint (mirrors, test servers)
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            adjust: default_adjust(),
            timeout_secs: default_timeout_secs(),
            base_url: None,
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "pretty".into()
}
fn default_symbol() -> String {
    "000001.SZ".into()
}
fn default_lookback_days() -> u32 {
    365
}
fn default_window() -> usize {
    10
}
fn default_horizon() -> usize {
    20
}
fn default_min_samples() -> usize {
    3
}
fn default_min_months() -> usize {
    2
}
fn default_ma_windows() -> Vec<usize> {
    vec![5, 10, 20]
}
fn default_significance_level() -> f64 {
    0.05
}
fn default_provider() -> String {
    "eastmoney".into()
}
fn default_adjust() -> String {
    "qfq".into()
}
fn default_timeout_secs() -> u64 {
    30
}
