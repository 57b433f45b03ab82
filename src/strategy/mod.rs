//! Strategy Layer - Statistical-arbitrage signal pipeline
//!
//! Leaf-first:
//! - `stats`: mean, sample standard deviation, Pearson correlation
//! - `transforms`: safe log, log returns, tail alignment, rolling z-score
//! - `ols`: single-predictor least squares (hedge ratio)
//! - `adf`: single-lag Dickey-Fuller style stationarity test
//! - `pair_signal`: hedge ratio + spread + z-score for one pair
//! - `screener`: classify and rank a universe against one base symbol
//! - `alerts`: z-score band crossings for notifications
//!
//! Everything here is synchronous and free of I/O.

pub mod params;
pub mod stats;
pub mod transforms;
pub mod ols;
pub mod adf;
pub mod pair_signal;
pub mod screener;
pub mod alerts;

pub use params::{ParamError, ScreenerConfig, SignalConfig};
pub use stats::{correlation, mean, stdev, variance, Estimate, Undefined};
pub use transforms::{align_tail, log_returns, log_series, rolling_zscore, safe_log};
pub use ols::{ols_fit, Regression};
pub use adf::{adf_test, Stationarity, CRITICAL_10PCT, CRITICAL_5PCT, MIN_ADF_SAMPLES};
pub use pair_signal::{build_spread, PairSignalEvaluator};
pub use screener::{best_opportunity, classify, rank_rows, ready_only, Screener};
pub use alerts::{detect_crossings, AlertEvent, AlertKind, AlertRules};
