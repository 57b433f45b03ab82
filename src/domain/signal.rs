use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete action derived from the latest spread z-score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    /// Spread rich: short leg A, long leg B
    ShortSpread,
    /// Spread cheap: long leg A, short leg B
    LongSpread,
    /// Inside the entry band
    Wait,
}

impl TradeAction {
    /// Classify a z-score against a symmetric entry band.
    /// An undefined z-score never triggers an entry.
    pub fn from_z(z: Option<f64>, entry_threshold: f64) -> Self {
        match z {
            Some(z) if z >= entry_threshold => TradeAction::ShortSpread,
            Some(z) if z <= -entry_threshold => TradeAction::LongSpread,
            _ => TradeAction::Wait,
        }
    }

    /// Human readable instruction for the given legs
    pub fn describe(&self, symbol_a: &str, symbol_b: &str) -> String {
        match self {
            TradeAction::ShortSpread => format!("SHORT {} / LONG {}", symbol_a, symbol_b),
            TradeAction::LongSpread => format!("LONG {} / SHORT {}", symbol_a, symbol_b),
            TradeAction::Wait => "WAIT".to_string(),
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::ShortSpread => write!(f, "short A / long B"),
            TradeAction::LongSpread => write!(f, "long A / short B"),
            TradeAction::Wait => write!(f, "wait"),
        }
    }
}

/// Signal for one pair of aligned price series.
///
/// Built fresh on every evaluation; nothing in here is updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSignal {
    /// OLS hedge ratio of ln(A) on ln(B)
    pub hedge_ratio: f64,
    /// Latest spread value ln(A) - beta * ln(B)
    pub spread: f64,
    /// Mean of the trailing z-score window ending at the latest bar
    pub rolling_mean: Option<f64>,
    /// Sample standard deviation of that window
    pub rolling_std: Option<f64>,
    /// Latest z-score, if the window was not degenerate
    pub z_score: Option<f64>,
    /// Action classified from `z_score`
    pub action: TradeAction,
    /// Normal CDF of |z|, how unusual the current deviation is
    pub confidence: Option<f64>,
    /// Entry band used for `action`
    pub entry_threshold: f64,
    /// Exit band, advisory only (no position state is tracked)
    pub exit_threshold: f64,
    /// Effective rolling window used for the z-scores
    pub z_window: usize,
    /// Full spread history
    pub spread_series: Vec<f64>,
    /// Rolling z-score of `spread_series`
    pub z_series: Vec<Option<f64>>,
}

impl PairSignal {
    /// Calculates confidence based on z-score using standard normal CDF
    pub fn calculate_confidence(z_score: f64) -> f64 {
        use statrs::function::erf::erf;
        // Standard normal CDF: Φ(z) = 0.5 * (1 + erf(z / sqrt(2)))
        0.5 * (1.0 + erf(z_score / f64::sqrt(2.0)))
    }

    /// z-score one bar before the latest, used for crossing detection
    pub fn previous_z(&self) -> Option<f64> {
        let n = self.z_series.len();
        if n < 2 {
            return None;
        }
        self.z_series[n - 2]
    }

    /// Whether |z| has come back inside the advisory exit band
    pub fn is_inside_exit_band(&self) -> bool {
        self.z_score
            .map(|z| z.abs() <= self.exit_threshold)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_action_from_z() {
        assert_eq!(TradeAction::from_z(Some(2.0), 2.0), TradeAction::ShortSpread);
        assert_eq!(TradeAction::from_z(Some(-2.0), 2.0), TradeAction::LongSpread);
        assert_eq!(TradeAction::from_z(Some(1.99), 2.0), TradeAction::Wait);
        assert_eq!(TradeAction::from_z(None, 2.0), TradeAction::Wait);
    }

    #[test]
    fn test_action_describe() {
        assert_eq!(
            TradeAction::ShortSpread.describe("BTCUSDT", "ETHUSDT"),
            "SHORT BTCUSDT / LONG ETHUSDT"
        );
        assert_eq!(
            TradeAction::LongSpread.describe("BTCUSDT", "ETHUSDT"),
            "LONG BTCUSDT / SHORT ETHUSDT"
        );
        assert_eq!(TradeAction::Wait.describe("A", "B"), "WAIT");
    }

    #[test]
    fn test_confidence_calculation() {
        assert_relative_eq!(PairSignal::calculate_confidence(0.0), 0.5, epsilon = 0.001);
        assert_relative_eq!(PairSignal::calculate_confidence(1.0), 0.841, epsilon = 0.001);
        assert_relative_eq!(PairSignal::calculate_confidence(2.0), 0.977, epsilon = 0.001);
    }
}
