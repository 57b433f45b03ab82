//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    expand_path, load_config, load_or_default, AlertsSection, BinanceSection, Config, ConfigError,
    LoggingSection, PairSection, ScreenerSection, DEFAULT_CONFIG_PATH,
};
