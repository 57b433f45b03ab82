//! Series Transforms
//!
//! Guarded logarithms, log returns, tail alignment and the rolling z-score.
//!
//! Z-Score Formula: z = (x_i - rolling_mean) / rolling_std

use super::stats::{mean, stdev};

/// Floor applied before taking logs so zero or negative prices stay finite
pub const LOG_FLOOR: f64 = 1e-12;

/// Natural log of `max(value, 1e-12)`
pub fn safe_log(value: f64) -> f64 {
    value.max(LOG_FLOOR).ln()
}

/// `safe_log` over a whole series
pub fn log_series(prices: &[f64]) -> Vec<f64> {
    prices.iter().copied().map(safe_log).collect()
}

/// `safe_log(p[i]) - safe_log(p[i-1])` for i in 1..n (length n - 1)
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| safe_log(w[1]) - safe_log(w[0]))
        .collect()
}

/// Keep the most recent `min(len(a), len(b))` elements of each series.
///
/// Both inputs are ordered oldest to newest, so the oldest excess of the
/// longer series is dropped.
pub fn align_tail<'a>(a: &'a [f64], b: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    let n = a.len().min(b.len());
    (tail(a, n), tail(b, n))
}

/// Last `n` elements (the whole slice when shorter)
pub fn tail(xs: &[f64], n: usize) -> &[f64] {
    &xs[xs.len().saturating_sub(n)..]
}

/// Rolling z-score.
///
/// Index i uses the trailing `min(window, i + 1)` elements ending at i; the
/// window is clamped to at least 2. An index is `None` when its window has
/// fewer than two points or a zero / non-finite standard deviation.
pub fn rolling_zscore(series: &[f64], window: usize) -> Vec<Option<f64>> {
    let w = window.max(2);
    (0..series.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(w);
            zscore_of_window(&series[start..=i])
        })
        .collect()
}

/// z-score of the last element of `window` against the window itself
pub fn zscore_of_window(window: &[f64]) -> Option<f64> {
    let last = *window.last()?;
    let m = mean(window).ok()?;
    let sd = stdev(window).ok()?;
    if sd == 0.0 || !sd.is_finite() {
        return None;
    }
    let z = (last - m) / sd;
    z.is_finite().then_some(z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_safe_log_guards_non_positive() {
        assert_eq!(safe_log(0.0), LOG_FLOOR.ln());
        assert_eq!(safe_log(-5.0), LOG_FLOOR.ln());
        assert!(safe_log(0.0).is_finite());
        assert_relative_eq!(safe_log(std::f64::consts::E), 1.0);
    }

    #[test]
    fn test_log_returns_length_and_values() {
        let prices = [100.0, 110.0, 99.0];
        let r = log_returns(&prices);
        assert_eq!(r.len(), 2);
        assert_relative_eq!(r[0], (110.0f64 / 100.0).ln(), epsilon = 1e-12);
        assert_relative_eq!(r[1], (99.0f64 / 110.0).ln(), epsilon = 1e-12);
        assert!(log_returns(&[1.0]).is_empty());
    }

    #[test]
    fn test_align_tail_keeps_most_recent() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [30.0, 40.0, 50.0];
        let (a2, b2) = align_tail(&a, &b);
        assert_eq!(a2, &[3.0, 4.0, 5.0]);
        assert_eq!(b2, &b);
    }

    #[test]
    fn test_rolling_zscore_prefix_policy() {
        let series = [1.0, 2.0, 3.0, 4.0, 10.0];
        let z = rolling_zscore(&series, 3);
        assert_eq!(z.len(), 5);
        // Single-point window has no standard deviation
        assert!(z[0].is_none());
        // Index 1 uses the two available points [1, 2]
        let expected = (2.0 - 1.5) / (0.5f64).sqrt();
        assert_relative_eq!(z[1].unwrap(), expected, epsilon = 1e-12);
        // Index 4 uses [3, 4, 10]
        let w = [3.0, 4.0, 10.0];
        let m = mean(&w).unwrap();
        let sd = stdev(&w).unwrap();
        assert_relative_eq!(z[4].unwrap(), (10.0 - m) / sd, epsilon = 1e-12);
    }

    #[test]
    fn test_rolling_zscore_flat_window_is_undefined() {
        let series = [5.0, 5.0, 5.0, 5.0, 6.0];
        let z = rolling_zscore(&series, 3);
        assert!(z[..4].iter().all(Option::is_none));
        assert!(z[4].is_some());
    }

    #[test]
    fn test_rolling_zscore_window_clamped_to_two() {
        let series = [1.0, 3.0, 2.0];
        assert_eq!(rolling_zscore(&series, 0), rolling_zscore(&series, 2));
    }
}
