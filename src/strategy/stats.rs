//! Descriptive Statistics
//!
//! Mean, sample variance/standard deviation and Pearson correlation.
//! Degenerate inputs come back as [`Undefined`] instead of NaN so callers
//! cannot silently feed them into later arithmetic.

use thiserror::Error;

/// Reason a statistic could not be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Undefined {
    #[error("empty input")]
    Empty,
    #[error("insufficient data: requires {required} elements, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    #[error("zero or non-finite variance")]
    DegenerateVariance,
    #[error("non-finite result")]
    NonFinite,
    #[error("no residual degrees of freedom")]
    NoDegreesOfFreedom,
}

/// Either a value or the reason it is undefined
pub type Estimate<T> = Result<T, Undefined>;

/// Fail with `InsufficientData` unless `actual >= required`
pub fn require_len(actual: usize, required: usize) -> Estimate<()> {
    if actual < required {
        return Err(Undefined::InsufficientData { required, actual });
    }
    Ok(())
}

/// Arithmetic mean.
///
/// Accumulates deviations from the first element, so a constant series
/// has a mean exactly equal to that constant.
pub fn mean(xs: &[f64]) -> Estimate<f64> {
    let first = *xs.first().ok_or(Undefined::Empty)?;
    let shifted: f64 = xs.iter().map(|x| x - first).sum();
    Ok(first + shifted / xs.len() as f64)
}

/// Sample variance with Bessel's correction
pub fn variance(xs: &[f64]) -> Estimate<f64> {
    require_len(xs.len(), 2)?;
    let m = mean(xs)?;
    let ss: f64 = xs.iter().map(|x| (x - m) * (x - m)).sum();
    Ok(ss / (xs.len() - 1) as f64)
}

/// Sample standard deviation
pub fn stdev(xs: &[f64]) -> Estimate<f64> {
    variance(xs).map(f64::sqrt)
}

/// Pearson correlation over the first `min(len(x), len(y))` elements
pub fn correlation(x: &[f64], y: &[f64]) -> Estimate<f64> {
    let n = x.len().min(y.len());
    require_len(n, 2)?;
    let (x, y) = (&x[..n], &y[..n]);

    let mx = mean(x)?;
    let my = mean(y)?;

    let mut num = 0.0;
    let mut dx2 = 0.0;
    let mut dy2 = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        num += dx * dy;
        dx2 += dx * dx;
        dy2 += dy * dy;
    }

    let den = (dx2 * dy2).sqrt();
    if den == 0.0 || !den.is_finite() {
        return Err(Undefined::DegenerateVariance);
    }
    // Rounding can push |r| a hair past 1
    Ok((num / den).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
        assert_eq!(mean(&[]), Err(Undefined::Empty));
    }

    #[test]
    fn test_mean_of_constant_is_exact() {
        let xs = [0.1; 7];
        assert_eq!(mean(&xs).unwrap(), 0.1);
    }

    #[test]
    fn test_stdev_bessel() {
        // Sum of squared deviations = 32, n - 1 = 7
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(stdev(&xs).unwrap(), (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_stdev_constant_is_exactly_zero() {
        assert_eq!(stdev(&[0.3; 2]).unwrap(), 0.0);
        assert_eq!(stdev(&[104.37; 50]).unwrap(), 0.0);
    }

    #[test]
    fn test_stdev_needs_two_points() {
        assert_eq!(
            stdev(&[1.0]),
            Err(Undefined::InsufficientData { required: 2, actual: 1 })
        );
    }

    #[test]
    fn test_correlation_perfect() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert_relative_eq!(correlation(&x, &y).unwrap(), 1.0, epsilon = 1e-12);

        let neg: Vec<f64> = y.iter().map(|v| -v).collect();
        assert_relative_eq!(correlation(&x, &neg).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_correlation_truncates_to_shorter() {
        let x = [1.0, 2.0, 3.0];
        let y = [1.0, 2.0, 3.0, -100.0, 42.0];
        assert_relative_eq!(correlation(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_correlation_degenerate() {
        assert_eq!(correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), Err(Undefined::DegenerateVariance));
        assert!(matches!(
            correlation(&[1.0], &[2.0]),
            Err(Undefined::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_correlation_bounded() {
        let x: Vec<f64> = (0..200).map(|i| ((i * 7919) % 113) as f64 * 0.37).collect();
        let y: Vec<f64> = (0..200).map(|i| ((i * 104_729) % 97) as f64 - 0.5 * x[i]).collect();
        let r = correlation(&x, &y).unwrap();
        assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&r));
    }
}
