//! Pair Signal Evaluator
//!
//! Turns two aligned price histories into a hedge ratio, a log-space
//! spread and its rolling z-score, then classifies the latest z-score.
//!
//! spread[i] = ln(A[i]) - beta * ln(B[i])
//!
//! The hedge ratio is fitted once per call over the most recent
//! `beta_lookback` bars so it tracks recent co-movement; the whole history
//! is then priced with that single beta. Evaluation is a pure function of
//! its inputs.

use crate::domain::{PairSignal, TradeAction};
use crate::strategy::ols::ols_fit;
use crate::strategy::params::SignalConfig;
use crate::strategy::stats::{mean, require_len, stdev, Estimate};
use crate::strategy::transforms::{align_tail, log_series, rolling_zscore, tail};

/// Evaluates pair signals with a fixed configuration
#[derive(Debug, Clone)]
pub struct PairSignalEvaluator {
    config: SignalConfig,
}

impl PairSignalEvaluator {
    /// Create a new evaluator with the given configuration
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Evaluate a pair from close prices, oldest first.
    ///
    /// The longer series loses its oldest excess bars. Undefined when fewer
    /// than two aligned bars remain or the hedge ratio cannot be fitted.
    pub fn evaluate(&self, prices_a: &[f64], prices_b: &[f64]) -> Estimate<PairSignal> {
        let (a, b) = align_tail(prices_a, prices_b);
        let n = a.len();
        require_len(n, 2)?;

        let ln_a = log_series(a);
        let ln_b = log_series(b);

        let hedge_ratio = self.hedge_ratio(&ln_a, &ln_b)?;
        let spread_series = build_spread(&ln_a, &ln_b, hedge_ratio);

        let z_window = self.z_window(n);
        let z_series = rolling_zscore(&spread_series, z_window);

        let latest_window = tail(&spread_series, z_window);
        let rolling_mean = mean(latest_window).ok();
        let rolling_std = stdev(latest_window).ok();

        let z_score = z_series.last().copied().flatten();
        let action = TradeAction::from_z(z_score, self.config.entry_threshold);
        let confidence = z_score.map(|z| PairSignal::calculate_confidence(z.abs()));
        let spread = spread_series[n - 1];

        Ok(PairSignal {
            hedge_ratio,
            spread,
            rolling_mean,
            rolling_std,
            z_score,
            action,
            confidence,
            entry_threshold: self.config.entry_threshold,
            exit_threshold: self.config.exit_threshold,
            z_window,
            spread_series,
            z_series,
        })
    }

    /// OLS slope of ln(A) on ln(B) over the trailing `beta_lookback` points
    pub fn hedge_ratio(&self, ln_a: &[f64], ln_b: &[f64]) -> Estimate<f64> {
        let (ln_a, ln_b) = align_tail(ln_a, ln_b);
        let w = self.config.beta_lookback.min(ln_a.len());
        let fit = ols_fit(tail(ln_b, w), tail(ln_a, w))?;
        Ok(fit.slope)
    }

    /// Rolling window actually used for `n` aligned bars (at least 2)
    pub fn z_window(&self, n: usize) -> usize {
        self.config.z_lookback.min(n).max(2)
    }
}

/// `ln_a[i] - beta * ln_b[i]` over the aligned length
pub fn build_spread(ln_a: &[f64], ln_b: &[f64], beta: f64) -> Vec<f64> {
    ln_a.iter().zip(ln_b).map(|(a, b)| a - beta * b).collect()
}
