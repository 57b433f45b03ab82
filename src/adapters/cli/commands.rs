//! CLI Command Definitions
//!
//! Argument parsing for the spreadwatch binary. Handlers live in `main.rs`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// Spreadwatch - Statistical-arbitrage pair signals for crypto
#[derive(Parser, Debug)]
#[command(
    name = "spreadwatch",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Statistical-arbitrage pair signals and a cointegration screener",
    long_about = "Spreadwatch screens a universe of symbols against a base symbol for \
                  correlated, cointegrated pairs and reports z-score entry signals \
                  for a monitored pair, with optional Telegram alerts."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen the universe against the base symbol
    Scan(ScanCmd),

    /// Evaluate one pair and print its signal
    Signal(SignalCmd),

    /// Evaluate the configured pair and send crossing alerts
    Alert(AlertCmd),

    /// Send one message through the notifier
    Notify(NotifyCmd),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Run the screener
#[derive(Parser, Debug)]
pub struct ScanCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Show every row even when the config asks for ready-only
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Re-scan every `refresh_minutes` until Ctrl+C
    #[arg(short, long)]
    pub watch: bool,
}

/// Evaluate one pair
#[derive(Parser, Debug)]
pub struct SignalCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override leg A symbol
    #[arg(long = "a", value_name = "SYMBOL")]
    pub symbol_a: Option<String>,

    /// Override leg B symbol
    #[arg(long = "b", value_name = "SYMBOL")]
    pub symbol_b: Option<String>,

    /// Override bar interval (e.g. 1h, 4h)
    #[arg(long, value_name = "INTERVAL")]
    pub interval: Option<String>,

    /// Override number of bars fetched
    #[arg(long, value_name = "N")]
    pub bars: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Evaluate the configured pair and notify on crossings
#[derive(Parser, Debug)]
pub struct AlertCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Send a ping with the current z-score before any alert
    #[arg(long)]
    pub ping: bool,

    /// Print the messages instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

/// Send one message
#[derive(Parser, Debug)]
pub struct NotifyCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Message text
    #[arg(value_name = "TEXT")]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan() {
        let app = CliApp::try_parse_from(["spreadwatch", "-v", "scan", "--all", "--format", "json"]).unwrap();
        assert!(app.verbose);
        match app.command {
            Command::Scan(cmd) => {
                assert!(cmd.all);
                assert!(!cmd.watch);
                assert_eq!(cmd.format, OutputFormat::Json);
                assert_eq!(cmd.config, PathBuf::from(DEFAULT_CONFIG_PATH));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_signal_overrides() {
        let app = CliApp::try_parse_from([
            "spreadwatch", "signal", "--a", "SOLUSDT", "--b", "ETHUSDT", "--interval", "4h", "--bars", "300",
        ])
        .unwrap();
        match app.command {
            Command::Signal(cmd) => {
                assert_eq!(cmd.symbol_a.as_deref(), Some("SOLUSDT"));
                assert_eq!(cmd.symbol_b.as_deref(), Some("ETHUSDT"));
                assert_eq!(cmd.interval.as_deref(), Some("4h"));
                assert_eq!(cmd.bars, Some(300));
                assert_eq!(cmd.format, OutputFormat::Text);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_alert_and_notify() {
        let app = CliApp::try_parse_from(["spreadwatch", "--debug", "alert", "--ping", "--dry-run"]).unwrap();
        assert!(app.debug);
        assert!(matches!(app.command, Command::Alert(AlertCmd { ping: true, dry_run: true, .. })));

        let app = CliApp::try_parse_from(["spreadwatch", "notify", "hello there"]).unwrap();
        match app.command {
            Command::Notify(cmd) => assert_eq!(cmd.text, "hello there"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_notify_requires_text() {
        assert!(CliApp::try_parse_from(["spreadwatch", "notify"]).is_err());
    }
}
