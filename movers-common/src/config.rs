//! Configuration types and loading.
//!
//! Configuration is layered, lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. An optional JSON file (`--config`, `TOP_MOVERS_CONFIG`, or `~/.top-movers/config.json`)
//! 3. Environment variables (empty values are treated as unset)
//!
//! The resulting [`Config`] is built once at startup and passed by reference
//! into every pipeline stage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result, ResultExt};

/// Target date override (`YYYYMMDD`).
pub const ENV_TARGET_DATE: &str = "TARGET_DATE";
/// Discord webhook endpoint.
pub const ENV_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
/// Explicit config file path.
pub const ENV_CONFIG_PATH: &str = "TOP_MOVERS_CONFIG";
pub const ENV_WEBHOOK_TIMEOUT: &str = "TOP_MOVERS_WEBHOOK_TIMEOUT_SECS";
pub const ENV_MIN_TRADING_VALUE: &str = "TOP_MOVERS_MIN_TRADING_VALUE";
pub const ENV_TOP_N: &str = "TOP_MOVERS_TOP_N";
pub const ENV_MARKET: &str = "TOP_MOVERS_MARKET";
pub const ENV_KRX_BASE_URL: &str = "TOP_MOVERS_KRX_BASE_URL";
pub const ENV_LOG_LEVEL: &str = "TOP_MOVERS_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "TOP_MOVERS_LOG_FORMAT";

/// 500억 원.
pub const DEFAULT_MIN_TRADING_VALUE: u64 = 50_000_000_000;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_KRX_BASE_URL: &str = "http://data.krx.co.kr";

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".top-movers"),
        |dirs| dirs.home_dir().join(".top-movers"),
    )
}

/// Get the default configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Market
// ============================================================================

/// KRX market segment to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    /// KOSPI + KOSDAQ + KONEX
    #[default]
    All,
    Kospi,
    Kosdaq,
    Konex,
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "ALL"),
            Self::Kospi => write!(f, "KOSPI"),
            Self::Kosdaq => write!(f, "KOSDAQ"),
            Self::Konex => write!(f, "KONEX"),
        }
    }
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "KOSPI" | "STK" => Ok(Self::Kospi),
            "KOSDAQ" | "KSQ" => Ok(Self::Kosdaq),
            "KONEX" | "KNX" => Ok(Self::Konex),
            _ => Err(format!("Unknown market: {}", s)),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Webhook delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Discord webhook URL. Delivery is skipped when absent.
    #[serde(default)]
    pub url: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_webhook_timeout(),
        }
    }
}

/// Filter and ranking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// Minimum daily turnover (KRW) for a stock to qualify
    #[serde(default = "default_min_trading_value")]
    pub min_trading_value: u64,

    /// Number of stocks in the leaderboard
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default)]
    pub market: Market,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            min_trading_value: default_min_trading_value(),
            top_n: default_top_n(),
            market: Market::default(),
        }
    }
}

/// Market data provider endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_krx_base_url")]
    pub base_url: String,

    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_krx_base_url(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_webhook_timeout() -> u64 {
    DEFAULT_WEBHOOK_TIMEOUT_SECS
}

fn default_min_trading_value() -> u64 {
    DEFAULT_MIN_TRADING_VALUE
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_krx_base_url() -> String {
    DEFAULT_KRX_BASE_URL.to_string()
}

fn default_provider_timeout() -> u64 {
    DEFAULT_PROVIDER_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

// ============================================================================
// Config
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Trading date override (`YYYYMMDD`), used verbatim when non-empty
    #[serde(default)]
    pub target_date: Option<String>,

    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub screener: ScreenerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load the file layer only.
    ///
    /// An explicit path (argument, then `TOP_MOVERS_CONFIG`) must exist.
    /// The default path is optional and falls back to built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = non_empty(std::env::var(ENV_CONFIG_PATH).ok()).map(PathBuf::from);

        if let Some(path) = explicit.map(Path::to_path_buf).or(env_path) {
            return Self::load_from(&path);
        }

        let path = config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .context(format!("Failed to parse config from {}", path.display()))
    }

    /// Load the file layer, apply environment overrides and validate.
    pub fn load_with_env(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::load(explicit)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Empty values are ignored, so `TARGET_DATE=` behaves like an unset variable.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));

        // The date override is taken verbatim; only an empty string counts as unset
        if let Some(date) = lookup(ENV_TARGET_DATE).filter(|d| !d.is_empty()) {
            self.target_date = Some(date);
        }

        if let Some(url) = get(ENV_WEBHOOK_URL) {
            self.webhook.url = Some(url);
        }

        if let Some(secs) = get(ENV_WEBHOOK_TIMEOUT) {
            self.webhook.timeout_secs = parse_env(ENV_WEBHOOK_TIMEOUT, &secs)?;
        }

        if let Some(value) = get(ENV_MIN_TRADING_VALUE) {
            // Accept "50_000_000_000" and "50,000,000,000"
            let digits: String = value.chars().filter(|c| *c != '_' && *c != ',').collect();
            self.screener.min_trading_value = parse_env(ENV_MIN_TRADING_VALUE, &digits)?;
        }

        if let Some(n) = get(ENV_TOP_N) {
            self.screener.top_n = parse_env(ENV_TOP_N, &n)?;
        }

        if let Some(market) = get(ENV_MARKET) {
            self.screener.market = market
                .parse()
                .map_err(|e: String| Error::Config(format!("{}: {}", ENV_MARKET, e)))?;
        }

        if let Some(base_url) = get(ENV_KRX_BASE_URL) {
            self.provider.base_url = base_url;
        }

        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.observability.log_level = level;
        }

        if let Some(format) = get(ENV_LOG_FORMAT) {
            self.observability.log_format = format;
        }

        Ok(())
    }

    /// The configured target date override, if any. Not trimmed.
    pub fn target_date(&self) -> Option<&str> {
        self.target_date.as_deref().filter(|d| !d.is_empty())
    }

    /// The configured webhook URL, if any.
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has an invalid value: {}", key, value)))
}
