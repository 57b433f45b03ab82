//! Pair Monitor
//!
//! Evaluates the configured pair, detects z-score band crossings on the
//! latest bar and pushes one message per crossing through the notifier.

use std::sync::Arc;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{closes, PairSignal};
use crate::ports::{MarketDataError, NotifierPort, PriceHistoryPort};
use crate::strategy::{
    detect_crossings, AlertEvent, AlertRules, ParamError, PairSignalEvaluator, SignalConfig, Undefined,
};

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Failed to fetch {symbol}: {source}")]
    Fetch {
        symbol: String,
        #[source]
        source: MarketDataError,
    },
    #[error("Signal undefined: {0}")]
    Undefined(#[from] Undefined),
    #[error("Invalid signal parameters: {0}")]
    InvalidParams(#[from] ParamError),
}

/// Legs and history request for a monitored pair
#[derive(Debug, Clone, PartialEq)]
pub struct PairSpec {
    pub symbol_a: String,
    pub symbol_b: String,
    pub interval: String,
    pub bars: usize,
}

impl PairSpec {
    pub fn new(symbol_a: &str, symbol_b: &str, interval: &str, bars: usize) -> Self {
        Self {
            symbol_a: symbol_a.trim().to_uppercase(),
            symbol_b: symbol_b.trim().to_uppercase(),
            interval: interval.to_string(),
            bars,
        }
    }
}

/// Outcome of one monitor cycle
#[derive(Debug, Clone, Serialize)]
pub struct AlertReport {
    pub signal: PairSignal,
    pub events: Vec<AlertEvent>,
    /// Messages in send order, ping first when requested
    pub messages: Vec<String>,
    /// Messages the notifier accepted
    pub delivered: usize,
}

pub struct PairMonitor<P, N> {
    prices: Arc<P>,
    notifier: Arc<N>,
    pair: PairSpec,
    evaluator: PairSignalEvaluator,
    rules: AlertRules,
}

impl<P, N> PairMonitor<P, N>
where
    P: PriceHistoryPort,
    N: NotifierPort,
{
    pub fn new(
        prices: Arc<P>,
        notifier: Arc<N>,
        pair: PairSpec,
        config: SignalConfig,
        rules: AlertRules,
    ) -> Self {
        Self {
            prices,
            notifier,
            pair,
            evaluator: PairSignalEvaluator::new(config),
            rules,
        }
    }

    pub fn pair(&self) -> &PairSpec {
        &self.pair
    }

    /// Fetch both legs concurrently and evaluate the pair
    pub async fn evaluate(&self) -> Result<PairSignal, MonitorError> {
        evaluate_pair(self.prices.as_ref(), &self.pair, &self.evaluator).await
    }

    /// Run one cycle: evaluate, detect crossings, notify.
    ///
    /// With `dry_run` nothing is sent. Delivery failures are logged and
    /// do not abort the cycle.
    pub async fn check(&self, ping: bool, dry_run: bool) -> Result<AlertReport, MonitorError> {
        let signal = self.evaluate().await?;
        let events = detect_crossings(signal.previous_z(), signal.z_score, &self.rules);

        let mut messages = Vec::with_capacity(events.len() + 1);
        if ping {
            messages.push(self.ping_message(&signal));
        }
        messages.extend(
            events
                .iter()
                .map(|e| e.message(&self.pair.symbol_a, &self.pair.symbol_b)),
        );

        let mut delivered = 0;
        if !dry_run {
            for message in &messages {
                match self.notifier.notify(message).await {
                    Ok(()) => delivered += 1,
                    Err(e) => tracing::warn!("Notification failed: {}", e),
                }
            }
        }

        if !events.is_empty() {
            tracing::info!("{} alert(s) for {} / {}", events.len(), self.pair.symbol_a, self.pair.symbol_b);
        }

        Ok(AlertReport {
            signal,
            events,
            messages,
            delivered,
        })
    }

    fn ping_message(&self, signal: &PairSignal) -> String {
        let z = signal
            .z_score
            .map(|z| format!("{:.2}", z))
            .unwrap_or_else(|| "n/a".to_string());
        format!("PING {} / {} | z={}", self.pair.symbol_a, self.pair.symbol_b, z)
    }
}

/// Fetch both legs of `pair` concurrently and evaluate them
pub async fn evaluate_pair<P>(
    prices: &P,
    pair: &PairSpec,
    evaluator: &PairSignalEvaluator,
) -> Result<PairSignal, MonitorError>
where
    P: PriceHistoryPort + ?Sized,
{
    evaluator.config().validate()?;

    let (a, b) = tokio::join!(
        fetch_closes(prices, pair, &pair.symbol_a),
        fetch_closes(prices, pair, &pair.symbol_b)
    );
    let signal = evaluator.evaluate(&a?, &b?)?;

    tracing::info!(
        "{} / {}: beta={:.4} z={:?} action={}",
        pair.symbol_a,
        pair.symbol_b,
        signal.hedge_ratio,
        signal.z_score,
        signal.action
    );
    Ok(signal)
}

async fn fetch_closes<P>(prices: &P, pair: &PairSpec, symbol: &str) -> Result<Vec<f64>, MonitorError>
where
    P: PriceHistoryPort + ?Sized,
{
    prices
        .fetch_price_history(symbol, &pair.interval, pair.bars)
        .await
        .map(|bars| closes(&bars))
        .map_err(|source| MonitorError::Fetch {
            symbol: symbol.to_string(),
            source,
        })
}
