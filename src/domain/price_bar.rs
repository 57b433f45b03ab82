use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar as returned by the price-history collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// All prices finite and the bar spans a positive interval
    pub fn is_valid(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite())
            && self.close_time > self.open_time
    }
}

/// Extract close prices, oldest first
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(close: f64) -> PriceBar {
        PriceBar {
            open_time: Utc.timestamp_millis_opt(0).unwrap(),
            close_time: Utc.timestamp_millis_opt(3_599_999).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn test_closes_preserve_order() {
        let bars = vec![bar(1.0), bar(2.0), bar(3.0)];
        assert_eq!(closes(&bars), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_bar_validity() {
        assert!(bar(100.0).is_valid());

        let mut nan_close = bar(100.0);
        nan_close.close = f64::NAN;
        assert!(!nan_close.is_valid());

        let mut inverted = bar(100.0);
        inverted.close_time = inverted.open_time;
        assert!(!inverted.is_valid());
    }
}
