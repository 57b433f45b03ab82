use serde::{Deserialize, Serialize};
use std::fmt;

/// Tradability tier of a screened symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusTier {
    Strong,
    Potential,
    Wait,
}

impl StatusTier {
    /// Sort key, lower ranks first
    pub fn rank(&self) -> u8 {
        match self {
            StatusTier::Strong => 0,
            StatusTier::Potential => 1,
            StatusTier::Wait => 2,
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusTier::Strong => write!(f, "STRONG"),
            StatusTier::Potential => write!(f, "POTENTIAL"),
            StatusTier::Wait => write!(f, "WAIT"),
        }
    }
}

/// Why a row landed in its tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowNote {
    StrongEntryReady,
    StrongWaitForZ,
    PotentialEntryReady,
    PotentialWatch,
    CointegrationWeak,
    CorrelationLow,
    CointegrationFails,
    FetchFailed,
    EvaluationAborted,
}

impl fmt::Display for RowNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RowNote::StrongEntryReady => "STRONG + entry ready",
            RowNote::StrongWaitForZ => "STRONG (wait for Z)",
            RowNote::PotentialEntryReady => "potential + entry ready",
            RowNote::PotentialWatch => "potential (watch)",
            RowNote::CointegrationWeak => "correlation adequate, cointegration weak",
            RowNote::CorrelationLow => "correlation low",
            RowNote::CointegrationFails => "cointegration fails",
            RowNote::FetchFailed => "fetch failed",
            RowNote::EvaluationAborted => "evaluation aborted",
        };
        f.write_str(text)
    }
}

/// One screened symbol measured against the base symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerRow {
    pub symbol: String,
    /// Log-return correlation with the base
    pub correlation: Option<f64>,
    /// Hedge ratio of ln(base) on ln(symbol)
    pub hedge_ratio: Option<f64>,
    /// Stationarity t-statistic of the spread
    pub adf_t_stat: Option<f64>,
    /// Spread passes the 5% critical value
    pub coint_pass_5: Option<bool>,
    pub z_now: Option<f64>,
    /// Largest |z| inside the trailing z window
    pub z_max_abs: Option<f64>,
    pub status: StatusTier,
    pub note: RowNote,
}

impl ScreenerRow {
    /// Row for a symbol whose price history could not be retrieved
    pub fn fetch_failed(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            correlation: None,
            hedge_ratio: None,
            adf_t_stat: None,
            coint_pass_5: None,
            z_now: None,
            z_max_abs: None,
            status: StatusTier::Wait,
            note: RowNote::FetchFailed,
        }
    }

    /// Row for a symbol whose evaluation task died before reporting
    pub fn evaluation_aborted(symbol: impl Into<String>) -> Self {
        Self {
            note: RowNote::EvaluationAborted,
            ..Self::fetch_failed(symbol)
        }
    }

    /// No metrics could be produced for this row
    pub fn is_failed(&self) -> bool {
        matches!(self.note, RowNote::FetchFailed | RowNote::EvaluationAborted)
    }

    /// STRONG with |z| at or beyond the entry threshold
    pub fn is_ready(&self, entry_threshold: f64) -> bool {
        self.status == StatusTier::Strong
            && self.z_now.map(|z| z.abs() >= entry_threshold).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_rank_order() {
        assert!(StatusTier::Strong.rank() < StatusTier::Potential.rank());
        assert!(StatusTier::Potential.rank() < StatusTier::Wait.rank());
        assert_eq!(StatusTier::Strong.to_string(), "STRONG");
    }

    #[test]
    fn test_fetch_failed_row() {
        let row = ScreenerRow::fetch_failed("OPUSDT");
        assert_eq!(row.status, StatusTier::Wait);
        assert_eq!(row.note, RowNote::FetchFailed);
        assert_eq!(row.note.to_string(), "fetch failed");
        assert!(row.correlation.is_none());
        assert!(!row.is_ready(2.0));
    }

    #[test]
    fn test_evaluation_aborted_row() {
        let row = ScreenerRow::evaluation_aborted("OPUSDT");
        assert_eq!(row.status, StatusTier::Wait);
        assert_eq!(row.note.to_string(), "evaluation aborted");
        assert!(row.is_failed());
        assert!(ScreenerRow::fetch_failed("OPUSDT").is_failed());
    }

    #[test]
    fn test_row_readiness() {
        let mut row = ScreenerRow::fetch_failed("ETHUSDT");
        row.status = StatusTier::Strong;
        row.z_now = Some(-2.4);
        assert!(row.is_ready(2.0));
        row.z_now = Some(1.2);
        assert!(!row.is_ready(2.0));
    }
}
