//! Single-predictor ordinary least squares.
//!
//! Fits `y = alpha + beta * x`. No weighting, regularisation or outlier
//! handling: this is a fast screening heuristic, not a precision estimator.

use serde::{Deserialize, Serialize};

use super::stats::{mean, require_len, Estimate, Undefined};

/// Slope and intercept of a fitted line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    /// Slope (beta)
    pub slope: f64,
    /// Intercept (alpha)
    pub intercept: f64,
}

impl Regression {
    /// Fitted value at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// OLS fit over the first `min(len(x), len(y))` aligned elements.
///
/// `beta = cov(x, y) / var(x)`, `alpha = mean(y) - beta * mean(x)`.
pub fn ols_fit(x: &[f64], y: &[f64]) -> Estimate<Regression> {
    let n = x.len().min(y.len());
    require_len(n, 2)?;
    let (x, y) = (&x[..n], &y[..n]);

    let mx = mean(x)?;
    let my = mean(y)?;

    let mut num = 0.0;
    let mut den = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        num += dx * (b - my);
        den += dx * dx;
    }

    if den == 0.0 || !den.is_finite() {
        return Err(Undefined::DegenerateVariance);
    }

    let slope = num / den;
    let intercept = my - slope * mx;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(Undefined::NonFinite);
    }

    Ok(Regression { slope, intercept })
}
