//! Scan Service
//!
//! Runs the screener against live price history. The base symbol is fetched
//! first; every candidate is then fetched and evaluated in its own task and
//! the rows are joined before ranking.

use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinSet;

use crate::domain::{closes, ScreenerRow};
use crate::ports::{MarketDataError, PriceHistoryPort};
use crate::strategy::{best_opportunity, rank_rows, ready_only, ParamError, Screener, ScreenerConfig};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to fetch base symbol {symbol}: {source}")]
    BaseFetch {
        symbol: String,
        #[source]
        source: MarketDataError,
    },
    #[error("Invalid screener parameters: {0}")]
    InvalidParams(#[from] ParamError),
}

/// Ranked result of one full scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub base: String,
    pub interval: String,
    pub entry_threshold: f64,
    pub scanned_at: DateTime<Utc>,
    pub rows: Vec<ScreenerRow>,
}

impl ScanReport {
    /// Rows to display, optionally restricted to entry-ready STRONG rows
    pub fn displayed(&self, ready: bool) -> Vec<ScreenerRow> {
        if ready {
            ready_only(&self.rows, self.entry_threshold)
        } else {
            self.rows.clone()
        }
    }

    /// Top displayed row
    pub fn best(&self, ready: bool) -> Option<ScreenerRow> {
        best_opportunity(&self.displayed(ready)).cloned()
    }

    pub fn failed_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.is_failed())
            .count()
    }
}

/// Concurrent screener over a price history port
pub struct ScanService<P> {
    prices: Arc<P>,
    screener: Screener,
}

impl<P> ScanService<P>
where
    P: PriceHistoryPort + 'static,
{
    pub fn new(prices: Arc<P>, config: ScreenerConfig) -> Self {
        Self {
            prices,
            screener: Screener::new(config),
        }
    }

    pub fn config(&self) -> &ScreenerConfig {
        self.screener.config()
    }

    /// Run one full scan.
    ///
    /// Only a base fetch failure is fatal; a failed candidate becomes a
    /// `fetch failed` row.
    pub async fn scan(&self) -> Result<ScanReport, ScanError> {
        let config = self.screener.config().clone();
        config.validate()?;

        let base = config.base.trim().to_uppercase();
        let candidates = config.candidates();
        tracing::info!(
            "Scanning {} candidates against {} ({} x {})",
            candidates.len(),
            base,
            config.bars,
            config.interval
        );

        let base_bars = self
            .prices
            .fetch_price_history(&base, &config.interval, config.bars)
            .await
            .map_err(|source| ScanError::BaseFetch {
                symbol: base.clone(),
                source,
            })?;
        let base_closes = Arc::new(closes(&base_bars));

        let mut tasks = JoinSet::new();
        for (slot, symbol) in candidates.iter().cloned().enumerate() {
            let prices = Arc::clone(&self.prices);
            let screener = self.screener.clone();
            let base_closes = Arc::clone(&base_closes);
            let interval = config.interval.clone();
            let bars = config.bars;

            tasks.spawn(async move {
                let row = match prices.fetch_price_history(&symbol, &interval, bars).await {
                    Ok(history) => {
                        let row = screener.evaluate_symbol(&symbol, &base_closes, &closes(&history));
                        tracing::debug!(
                            "{}: corr={:?} beta={:?} adf={:?} z={:?} -> {} ({})",
                            symbol,
                            row.correlation,
                            row.hedge_ratio,
                            row.adf_t_stat,
                            row.z_now,
                            row.status,
                            row.note
                        );
                        row
                    }
                    Err(e) => {
                        tracing::warn!("Fetch failed for {}: {}", symbol, e);
                        ScreenerRow::fetch_failed(symbol)
                    }
                };
                (slot, row)
            });
        }

        let mut slots: Vec<Option<ScreenerRow>> = (0..candidates.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, row)) => slots[slot] = Some(row),
                Err(e) => tracing::warn!("Scan task aborted: {}", e),
            }
        }

        let mut rows: Vec<ScreenerRow> = slots
            .into_iter()
            .zip(candidates)
            .map(|(row, symbol)| row.unwrap_or_else(|| ScreenerRow::evaluation_aborted(symbol)))
            .collect();
        rank_rows(&mut rows);

        let report = ScanReport {
            base,
            interval: config.interval.clone(),
            entry_threshold: config.entry_threshold,
            scanned_at: Utc::now(),
            rows,
        };
        tracing::info!(
            "Scan complete: {} rows, {} failed, {} entry ready",
            report.rows.len(),
            report.failed_count(),
            report.displayed(true).len()
        );
        Ok(report)
    }
}
