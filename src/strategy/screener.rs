//! Pair Screener
//!
//! Scores every candidate symbol against one base symbol and ranks them by
//! statistical tradability:
//!
//! 1. Log-return correlation over the trailing correlation window
//! 2. Hedge ratio, spread and rolling z-score via [`PairSignalEvaluator`]
//!    (base regressed on candidate)
//! 3. Stationarity test on the full spread
//! 4. Tier classification, then ranking by tier and correlation
//!
//! Pure aggregation over already-fetched closes. A candidate whose history
//! could not be fetched still gets a row, marked as such.

use crate::domain::{RowNote, ScreenerRow, StatusTier};
use crate::strategy::adf::{adf_test, Stationarity};
use crate::strategy::pair_signal::PairSignalEvaluator;
use crate::strategy::params::{ScreenerConfig, SignalConfig};
use crate::strategy::stats::correlation;
use crate::strategy::transforms::{align_tail, log_returns, tail};

/// Correlation required for STRONG
pub const STRONG_CORRELATION: f64 = 0.75;
/// Correlation required for POTENTIAL with cointegration
pub const POTENTIAL_CORRELATION: f64 = 0.70;
/// Correlation required for POTENTIAL on z-score alone
pub const ADEQUATE_CORRELATION: f64 = 0.65;
/// Sort value for a missing correlation
const MISSING_CORRELATION_RANK: f64 = -999.0;

/// Multi-symbol screener with a fixed configuration
#[derive(Debug, Clone)]
pub struct Screener {
    config: ScreenerConfig,
}

impl Screener {
    /// Create a new screener with the given configuration
    pub fn new(config: ScreenerConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Screen every fetched candidate and return the ranked table.
    ///
    /// Failed fetches become `fetch failed` rows instead of aborting.
    pub fn scan<E>(
        &self,
        base_closes: &[f64],
        candidates: Vec<(String, Result<Vec<f64>, E>)>,
    ) -> Vec<ScreenerRow> {
        let mut rows: Vec<ScreenerRow> = candidates
            .into_iter()
            .map(|(symbol, fetched)| match fetched {
                Ok(closes) => self.evaluate_symbol(&symbol, base_closes, &closes),
                Err(_) => ScreenerRow::fetch_failed(symbol),
            })
            .collect();
        rank_rows(&mut rows);
        rows
    }

    /// Measure one candidate against the base
    pub fn evaluate_symbol(&self, symbol: &str, base_closes: &[f64], closes: &[f64]) -> ScreenerRow {
        let (base, alt) = align_tail(base_closes, closes);
        let n = base.len();

        let base_ret = log_returns(base);
        let alt_ret = log_returns(alt);
        let w_corr = self.config.effective_window(self.config.corr_lookback, base_ret.len());
        let rho = correlation(tail(&alt_ret, w_corr), tail(&base_ret, w_corr)).ok();

        let w_z = self.config.effective_window(self.config.z_lookback, n);
        let evaluator = PairSignalEvaluator::new(SignalConfig {
            beta_lookback: self.config.effective_window(self.config.beta_lookback, n),
            z_lookback: w_z,
            entry_threshold: self.config.entry_threshold,
            exit_threshold: 0.0,
        });

        let (hedge_ratio, stationarity, z_now, z_max_abs) = match evaluator.evaluate(base, alt) {
            Ok(signal) => {
                let stationarity = adf_test(&signal.spread_series).ok();
                let z_max_abs = signal.z_series[signal.z_series.len().saturating_sub(w_z)..]
                    .iter()
                    .flatten()
                    .map(|z| z.abs())
                    .fold(None, |acc: Option<f64>, z| Some(acc.map_or(z, |m| m.max(z))));
                (Some(signal.hedge_ratio), stationarity, signal.z_score, z_max_abs)
            }
            Err(_) => (None, None, None, None),
        };

        let (status, note) = classify(rho, stationarity, z_now, self.config.entry_threshold);

        ScreenerRow {
            symbol: symbol.to_string(),
            correlation: rho,
            hedge_ratio,
            adf_t_stat: stationarity.map(|s| s.t_stat),
            coint_pass_5: stationarity.map(|s| s.pass_5),
            z_now,
            z_max_abs,
            status,
            note,
        }
    }
}

/// Tier and note for one row; the first matching rule wins.
///
/// An undefined correlation fails every correlation threshold and an
/// undefined stationarity result fails both critical values.
pub fn classify(
    correlation: Option<f64>,
    stationarity: Option<Stationarity>,
    z_now: Option<f64>,
    entry_threshold: f64,
) -> (StatusTier, RowNote) {
    let corr_at_least = |threshold: f64| {
        correlation
            .map(|r| r.is_finite() && r >= threshold)
            .unwrap_or(false)
    };
    let pass_5 = stationarity.map(|s| s.pass_5).unwrap_or(false);
    let pass_10 = stationarity.map(|s| s.pass_10).unwrap_or(false);
    let z_ready = z_now
        .map(|z| z.is_finite() && z.abs() >= entry_threshold)
        .unwrap_or(false);

    if corr_at_least(STRONG_CORRELATION) && pass_5 {
        let note = if z_ready { RowNote::StrongEntryReady } else { RowNote::StrongWaitForZ };
        (StatusTier::Strong, note)
    } else if corr_at_least(POTENTIAL_CORRELATION) && (pass_5 || pass_10) {
        let note = if z_ready { RowNote::PotentialEntryReady } else { RowNote::PotentialWatch };
        (StatusTier::Potential, note)
    } else if corr_at_least(ADEQUATE_CORRELATION) && z_ready {
        (StatusTier::Potential, RowNote::CointegrationWeak)
    } else if !corr_at_least(ADEQUATE_CORRELATION) {
        (StatusTier::Wait, RowNote::CorrelationLow)
    } else {
        (StatusTier::Wait, RowNote::CointegrationFails)
    }
}

/// Sort by tier, then correlation descending (missing sorts last).
/// Stable, so equal keys keep their input order.
pub fn rank_rows(rows: &mut [ScreenerRow]) {
    let corr_key = |row: &ScreenerRow| {
        row.correlation
            .filter(|r| r.is_finite())
            .unwrap_or(MISSING_CORRELATION_RANK)
    };
    rows.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| corr_key(b).total_cmp(&corr_key(a)))
    });
}

/// Keep only STRONG rows whose |z| has reached the entry threshold
pub fn ready_only(rows: &[ScreenerRow], entry_threshold: f64) -> Vec<ScreenerRow> {
    rows.iter()
        .filter(|row| row.is_ready(entry_threshold))
        .cloned()
        .collect()
}

/// Top of the displayed table
pub fn best_opportunity(rows: &[ScreenerRow]) -> Option<&ScreenerRow> {
    rows.first()
}
