//! Single-lag Dickey-Fuller style stationarity test
//!
//! Model: Δy_t = a + b * y_{t-1} + e_t, fitted by OLS of Δy on y_{t-1}.
//! The t-statistic of `b` is compared against two fixed approximate
//! critical values for a no-trend model:
//!
//! - 5%:  t < -2.86
//! - 10%: t < -2.57
//!
//! These are coarse threshold comparisons, NOT exact p-values. A more
//! negative t-statistic is stronger evidence that the series reverts to a
//! stable level, which is what a tradable spread should do.

use serde::{Deserialize, Serialize};

use super::ols::ols_fit;
use super::stats::{require_len, variance, Estimate, Undefined};

/// Minimum series length the test will run on
pub const MIN_ADF_SAMPLES: usize = 60;
/// Approximate 5% critical value (no trend)
pub const CRITICAL_5PCT: f64 = -2.86;
/// Approximate 10% critical value (no trend)
pub const CRITICAL_10PCT: f64 = -2.57;

/// Outcome of a stationarity test on one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stationarity {
    /// t-statistic of the lagged-level coefficient
    pub t_stat: f64,
    /// `t_stat < -2.86`
    pub pass_5: bool,
    /// `t_stat < -2.57`
    pub pass_10: bool,
}

impl Stationarity {
    fn from_t_stat(t_stat: f64) -> Self {
        Self {
            t_stat,
            pass_5: t_stat < CRITICAL_5PCT,
            pass_10: t_stat < CRITICAL_10PCT,
        }
    }
}

/// Run the test on a residual / spread series.
///
/// Undefined when `y.len() < 60`, the lagged level has zero or non-finite
/// variance, there are no residual degrees of freedom, or the standard
/// error of `b` is zero or non-finite.
pub fn adf_test(y: &[f64]) -> Estimate<Stationarity> {
    require_len(y.len(), MIN_ADF_SAMPLES)?;

    let lagged = &y[..y.len() - 1];
    let diffs: Vec<f64> = y.windows(2).map(|w| w[1] - w[0]).collect();
    let n_obs = diffs.len();

    let var_lag = variance(lagged)?;
    if !var_lag.is_finite() || var_lag <= 0.0 {
        return Err(Undefined::DegenerateVariance);
    }

    let fit = ols_fit(lagged, &diffs)?;

    let sse: f64 = lagged
        .iter()
        .zip(&diffs)
        .map(|(x, dy)| {
            let e = dy - fit.predict(*x);
            e * e
        })
        .sum();

    let dof = n_obs as i64 - 2;
    if dof <= 0 {
        return Err(Undefined::NoDegreesOfFreedom);
    }

    let sigma2 = sse / dof as f64;
    let se_b = (sigma2 / ((n_obs - 1) as f64 * var_lag)).sqrt();
    if !se_b.is_finite() || se_b == 0.0 {
        return Err(Undefined::NonFinite);
    }

    Ok(Stationarity::from_t_stat(fit.slope / se_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic LCG + Box-Muller noise for reproducibility
    fn ar1_series(n: usize, phi: f64, sigma: f64, seed: u64) -> Vec<f64> {
        let mut rng_state = seed;
        let mut y = Vec::with_capacity(n);
        y.push(0.0);
        for _ in 1..n {
            rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let u1 = (rng_state as f64) / (u64::MAX as f64);
            rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let u2 = (rng_state as f64) / (u64::MAX as f64);
            let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
            let prev = *y.last().unwrap();
            y.push(phi * prev + sigma * z);
        }
        y
    }

    #[test]
    fn test_short_series_is_undefined() {
        let y: Vec<f64> = (0..59).map(|i| (i as f64).sin()).collect();
        assert_eq!(
            adf_test(&y),
            Err(Undefined::InsufficientData { required: 60, actual: 59 })
        );
    }

    #[test]
    fn test_constant_series_is_undefined() {
        assert_eq!(adf_test(&[1.5; 100]), Err(Undefined::DegenerateVariance));
    }

    #[test]
    fn test_mean_reverting_passes() {
        let y = ar1_series(250, 0.5, 0.01, 12345);
        let result = adf_test(&y).unwrap();
        assert!(result.t_stat < CRITICAL_5PCT, "t = {}", result.t_stat);
        assert!(result.pass_5);
        assert!(result.pass_10);
    }

    #[test]
    fn test_random_walk_fails() {
        let y = ar1_series(200, 1.0, 0.01, 42);
        let result = adf_test(&y).unwrap();
        assert!(!result.pass_5, "t = {}", result.t_stat);
        assert!(!result.pass_10, "t = {}", result.t_stat);
    }

    #[test]
    fn test_pass_flags_follow_thresholds() {
        let between = Stationarity::from_t_stat(-2.7);
        assert!(!between.pass_5);
        assert!(between.pass_10);

        let strong = Stationarity::from_t_stat(-3.5);
        assert!(strong.pass_5 && strong.pass_10);
    }
}
