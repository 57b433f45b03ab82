//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Binance: REST kline history with mirror-host failover
//! - Telegram: Bot API notifier
//! - CLI: Command-line interface definitions and rendering

pub mod binance;
pub mod telegram;
pub mod cli;

pub use binance::{BinanceClient, BinanceConfig};
pub use telegram::{TelegramConfig, TelegramNotifier};
pub use cli::CliApp;
