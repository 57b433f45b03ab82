//! Configuration Loader
//!
//! Loads and validates configuration from TOML files. Every section and
//! field has a default, so a partial file (or an empty one) is valid.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::adapters::binance::{BinanceConfig, BINANCE_HOSTS};
use crate::adapters::telegram::{TelegramConfig, TELEGRAM_API_BASE};
use crate::strategy::params::{ScreenerConfig, SignalConfig, DEFAULT_QUOTE_ASSET, DEFAULT_UNIVERSE};
use crate::strategy::AlertRules;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main configuration structure matching config/default.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pair: PairSection,
    pub screener: ScreenerSection,
    pub alerts: AlertsSection,
    pub binance: BinanceSection,
    pub logging: LoggingSection,
}

/// Monitored pair section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PairSection {
    /// Leg A (regressed on B)
    pub symbol_a: String,
    /// Leg B
    pub symbol_b: String,
    /// Bar interval code, e.g. "1h"
    pub interval: String,
    /// Bars requested per leg
    pub bars: usize,
    pub beta_lookback: usize,
    pub z_lookback: usize,
    pub entry_threshold: f64,
    /// Advisory exit band
    pub exit_threshold: f64,
}

impl Default for PairSection {
    fn default() -> Self {
        let signal = SignalConfig::default();
        Self {
            symbol_a: "BTCUSDT".to_string(),
            symbol_b: "ETHUSDT".to_string(),
            interval: "1h".to_string(),
            bars: 500,
            beta_lookback: signal.beta_lookback,
            z_lookback: signal.z_lookback,
            entry_threshold: signal.entry_threshold,
            exit_threshold: signal.exit_threshold,
        }
    }
}

/// Screener section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScreenerSection {
    pub base: String,
    pub interval: String,
    pub bars: usize,
    pub corr_lookback: usize,
    pub beta_lookback: usize,
    pub z_lookback: usize,
    pub entry_threshold: f64,
    /// Floor for every effective lookback window
    pub min_window: usize,
    pub quote_asset: String,
    pub universe: Vec<String>,
    /// Show only STRONG rows at the entry threshold
    pub ready_only: bool,
    /// Re-scan period for `scan --watch`
    pub refresh_minutes: u64,
}

impl Default for ScreenerSection {
    fn default() -> Self {
        let screener = ScreenerConfig::default();
        Self {
            base: screener.base,
            interval: screener.interval,
            bars: screener.bars,
            corr_lookback: screener.corr_lookback,
            beta_lookback: screener.beta_lookback,
            z_lookback: screener.z_lookback,
            entry_threshold: screener.entry_threshold,
            min_window: screener.min_window,
            quote_asset: DEFAULT_QUOTE_ASSET.to_string(),
            universe: DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect(),
            ready_only: false,
            refresh_minutes: 15,
        }
    }
}

/// Alerts section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertsSection {
    /// |z| band that triggers a RISK alert
    pub risk_threshold: f64,
    /// Enable Telegram notifications
    pub telegram_enabled: bool,
    /// Telegram bot token (prefer TELEGRAM_BOT_TOKEN)
    pub telegram_bot_token: String,
    /// Telegram chat ID (prefer TELEGRAM_CHAT_ID)
    pub telegram_chat_id: String,
    pub telegram_api_base: String,
}

impl Default for AlertsSection {
    fn default() -> Self {
        Self {
            risk_threshold: AlertRules::default().risk,
            telegram_enabled: false,
            telegram_bot_token: String::new(),
            telegram_chat_id: String::new(),
            telegram_api_base: TELEGRAM_API_BASE.to_string(),
        }
    }
}

impl AlertsSection {
    /// Get bot token with environment variable override
    /// A set, non-empty TELEGRAM_BOT_TOKEN wins; otherwise the config value
    pub fn get_bot_token(&self) -> Option<String> {
        prefer_env(std::env::var("TELEGRAM_BOT_TOKEN").ok(), &self.telegram_bot_token)
    }

    /// Get chat ID with environment variable override
    /// A set, non-empty TELEGRAM_CHAT_ID wins; otherwise the config value
    pub fn get_chat_id(&self) -> Option<String> {
        prefer_env(std::env::var("TELEGRAM_CHAT_ID").ok(), &self.telegram_chat_id)
    }
}

/// Blank values count as unset on both sides
fn prefer_env(env: Option<String>, configured: &str) -> Option<String> {
    env.filter(|v| !v.trim().is_empty())
        .or_else(|| Some(configured.to_string()))
        .filter(|v| !v.trim().is_empty())
}

/// Binance REST section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BinanceSection {
    /// Hosts tried in order
    pub hosts: Vec<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BinanceSection {
    fn default() -> Self {
        Self {
            hosts: BINANCE_HOSTS.iter().map(|h| h.to_string()).collect(),
            timeout_secs: 10,
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: "warn".to_string() }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Expand `~` and environment variables in a config path
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => PathBuf::from(shellexpand::tilde(&raw).into_owned()),
    }
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = expand_path(path.as_ref());
    let content = std::fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load the file if it exists, otherwise fall back to defaults
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = expand_path(path.as_ref());
    if !path.exists() {
        tracing::info!("Config {} not found, using defaults", path.display());
        return Ok(Config::default());
    }
    load_config(path)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Pair section
        if self.pair.symbol_a.trim().is_empty() || self.pair.symbol_b.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "pair symbols cannot be empty".to_string(),
            ));
        }

        if self.pair.bars == 0 {
            return Err(ConfigError::ValidationError(
                "pair.bars must be > 0".to_string(),
            ));
        }

        SignalConfig::from(self)
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("pair: {}", e)))?;

        // Screener section
        ScreenerConfig::from(self)
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("screener: {}", e)))?;

        if self.screener.refresh_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "refresh_minutes must be >= 1".to_string(),
            ));
        }

        // Alerts
        let rules = AlertRules::from(self);
        if !rules.risk.is_finite() || rules.risk <= rules.entry {
            return Err(ConfigError::ValidationError(format!(
                "risk_threshold must be > entry_threshold ({}), got {}",
                rules.entry, rules.risk
            )));
        }

        // Binance
        if self.binance.hosts.iter().all(|h| h.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "binance.hosts cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// Conversions from Config into the strategy parameter structs
impl From<&Config> for SignalConfig {
    fn from(config: &Config) -> Self {
        SignalConfig {
            beta_lookback: config.pair.beta_lookback,
            z_lookback: config.pair.z_lookback,
            entry_threshold: config.pair.entry_threshold,
            exit_threshold: config.pair.exit_threshold,
        }
    }
}

impl From<&Config> for ScreenerConfig {
    fn from(config: &Config) -> Self {
        let s = &config.screener;
        ScreenerConfig {
            base: s.base.trim().to_uppercase(),
            interval: s.interval.clone(),
            bars: s.bars,
            corr_lookback: s.corr_lookback,
            beta_lookback: s.beta_lookback,
            z_lookback: s.z_lookback,
            entry_threshold: s.entry_threshold,
            min_window: s.min_window,
            quote_asset: s.quote_asset.clone(),
            universe: s.universe.clone(),
        }
    }
}

impl From<&Config> for AlertRules {
    fn from(config: &Config) -> Self {
        AlertRules {
            entry: config.pair.entry_threshold,
            exit: config.pair.exit_threshold,
            risk: config.alerts.risk_threshold,
        }
    }
}

impl From<&Config> for BinanceConfig {
    fn from(config: &Config) -> Self {
        BinanceConfig {
            hosts: config
                .binance
                .hosts
                .iter()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .collect(),
            timeout: Duration::from_secs(config.binance.timeout_secs.max(1)),
            ..BinanceConfig::default()
        }
    }
}

impl From<&Config> for TelegramConfig {
    fn from(config: &Config) -> Self {
        TelegramConfig {
            api_base: config.alerts.telegram_api_base.clone(),
            bot_token: config.alerts.get_bot_token(),
            chat_id: config.alerts.get_chat_id(),
            ..TelegramConfig::default()
        }
    }
}
