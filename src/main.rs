//! Spreadwatch - Statistical-arbitrage pair signals for crypto
//!
//! Screener, pair signal and alert commands over Binance price history.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use spreadwatch::adapters::cli::output::{render_alert, render_scan, render_signal};
use spreadwatch::adapters::cli::{AlertCmd, CliApp, Command, NotifyCmd, OutputFormat, ScanCmd, SignalCmd};
use spreadwatch::adapters::{BinanceClient, BinanceConfig, TelegramConfig, TelegramNotifier};
use spreadwatch::application::{evaluate_pair, PairMonitor, PairSpec, ScanService};
use spreadwatch::config::{load_or_default, Config};
use spreadwatch::ports::NotifierPort;
use spreadwatch::strategy::{AlertRules, PairSignalEvaluator, ScreenerConfig, SignalConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (secrets go here, not in the config file)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    let config = load_or_default(config_path(&app.command))
        .with_context(|| format!("Failed to load configuration {}", config_path(&app.command).display()))?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Scan(cmd) => scan_command(cmd, config).await,
        Command::Signal(cmd) => signal_command(cmd, config).await,
        Command::Alert(cmd) => alert_command(cmd, config).await,
        Command::Notify(cmd) => notify_command(cmd, config).await,
    }
}

fn config_path(command: &Command) -> &Path {
    match command {
        Command::Scan(cmd) => &cmd.config,
        Command::Signal(cmd) => &cmd.config,
        Command::Alert(cmd) => &cmd.config,
        Command::Notify(cmd) => &cmd.config,
    }
}

/// `--debug` and `--verbose` win, then RUST_LOG, then the config level
fn init_logging(verbose: bool, debug: bool, fallback: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    };

    fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

fn binance_client(config: &Config) -> Result<Arc<BinanceClient>> {
    let client = BinanceClient::with_config(BinanceConfig::from(config))
        .context("Failed to create Binance client")?;
    Ok(Arc::new(client))
}

async fn scan_command(cmd: ScanCmd, config: Config) -> Result<()> {
    let service = ScanService::new(binance_client(&config)?, ScreenerConfig::from(&config));
    let ready = config.screener.ready_only && !cmd.all;

    if !cmd.watch {
        return run_scan(&service, ready, cmd.format, false).await;
    }

    let period = Duration::from_secs(config.screener.refresh_minutes * 60);
    tracing::info!("Watching every {} minute(s), Ctrl+C to stop", config.screener.refresh_minutes);
    let mut ticker = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_scan(&service, ready, cmd.format, true).await {
                    tracing::error!("{:#}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }
    Ok(())
}

async fn run_scan(
    service: &ScanService<BinanceClient>,
    ready: bool,
    format: OutputFormat,
    clear: bool,
) -> Result<()> {
    let report = service.scan().await.context("Scan failed")?;
    let rows = report.displayed(ready);

    match format {
        OutputFormat::Text => {
            if clear {
                // Replace the previous table
                print!("\x1B[2J\x1B[H");
            }
            print!("{}", render_scan(&report, &rows));
        }
        OutputFormat::Json => {
            let body = serde_json::json!({
                "base": report.base,
                "interval": report.interval,
                "entry_threshold": report.entry_threshold,
                "scanned_at": report.scanned_at,
                "ready_only": ready,
                "rows": rows,
                "best": rows.first(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }
    Ok(())
}

async fn signal_command(cmd: SignalCmd, config: Config) -> Result<()> {
    let pair = PairSpec::new(
        cmd.symbol_a.as_deref().unwrap_or(&config.pair.symbol_a),
        cmd.symbol_b.as_deref().unwrap_or(&config.pair.symbol_b),
        cmd.interval.as_deref().unwrap_or(&config.pair.interval),
        cmd.bars.unwrap_or(config.pair.bars),
    );
    if pair.symbol_a.is_empty() || pair.symbol_b.is_empty() {
        bail!("Both pair symbols are required");
    }
    if pair.bars == 0 {
        bail!("--bars must be > 0");
    }

    let prices = binance_client(&config)?;
    let evaluator = PairSignalEvaluator::new(SignalConfig::from(&config));
    let signal = evaluate_pair(prices.as_ref(), &pair, &evaluator)
        .await
        .with_context(|| format!("Failed to evaluate {} / {}", pair.symbol_a, pair.symbol_b))?;

    match cmd.format {
        OutputFormat::Text => print!("{}", render_signal(&pair, &signal)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&signal)?),
    }
    Ok(())
}

async fn alert_command(cmd: AlertCmd, config: Config) -> Result<()> {
    let mut dry_run = cmd.dry_run;
    if !config.alerts.telegram_enabled && !dry_run {
        tracing::warn!("Telegram alerts disabled in config - printing messages instead");
        dry_run = true;
    }

    let notifier = TelegramNotifier::new(TelegramConfig::from(&config))
        .context("Failed to create Telegram notifier")?;
    let pair = PairSpec::new(
        &config.pair.symbol_a,
        &config.pair.symbol_b,
        &config.pair.interval,
        config.pair.bars,
    );
    let monitor = PairMonitor::new(
        binance_client(&config)?,
        Arc::new(notifier),
        pair.clone(),
        SignalConfig::from(&config),
        AlertRules::from(&config),
    );

    let report = monitor
        .check(cmd.ping, dry_run)
        .await
        .with_context(|| format!("Alert check failed for {} / {}", pair.symbol_a, pair.symbol_b))?;
    print!("{}", render_alert(&pair, &report, dry_run));
    Ok(())
}

async fn notify_command(cmd: NotifyCmd, config: Config) -> Result<()> {
    let notifier = TelegramNotifier::new(TelegramConfig::from(&config))
        .context("Failed to create Telegram notifier")?;
    notifier
        .notify(&cmd.text)
        .await
        .context("Failed to send message")?;

    println!("✓ Message sent");
    Ok(())
}
