//! Strategy Parameters
//!
//! Explicit configuration structs passed into the evaluator and screener at
//! call time. Nothing here is global, so concurrent scans with different
//! parameters never interfere.

use serde::{Deserialize, Serialize};

/// Default quote asset for screener universes
pub const DEFAULT_QUOTE_ASSET: &str = "USDT";

/// Default screener universe, screened against BTCUSDT
pub const DEFAULT_UNIVERSE: [&str; 9] = [
    "ETHUSDT", "SOLUSDT", "BNBUSDT", "AVAXUSDT", "LINKUSDT", "LTCUSDT", "OPUSDT", "ARBUSDT",
    "MATICUSDT",
];

/// Pair signal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Trailing points used to fit the hedge ratio
    pub beta_lookback: usize,
    /// Rolling window for the spread z-score
    pub z_lookback: usize,
    /// |z| at or beyond which an entry is signalled
    pub entry_threshold: f64,
    /// Advisory exit band, reported but not enforced
    pub exit_threshold: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            beta_lookback: 240,
            z_lookback: 168,
            entry_threshold: 2.0,
            exit_threshold: 0.7,
        }
    }
}

impl SignalConfig {
    /// Create a new config with custom entry threshold
    pub fn with_entry_threshold(mut self, threshold: f64) -> Self {
        self.entry_threshold = threshold;
        self
    }

    /// Create a new config with custom lookbacks
    pub fn with_lookbacks(mut self, beta_lookback: usize, z_lookback: usize) -> Self {
        self.beta_lookback = beta_lookback;
        self.z_lookback = z_lookback;
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ParamError> {
        validate_lookback("beta_lookback", self.beta_lookback)?;
        validate_lookback("z_lookback", self.z_lookback)?;
        validate_entry(self.entry_threshold)?;
        if !self.exit_threshold.is_finite()
            || self.exit_threshold < 0.0
            || self.exit_threshold >= self.entry_threshold
        {
            return Err(ParamError::InvalidExitThreshold(self.exit_threshold));
        }
        Ok(())
    }
}

/// Screener configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// Symbol every candidate is measured against
    pub base: String,
    /// Opaque bar-duration code handed to the price collaborator
    pub interval: String,
    /// Bars requested per symbol
    pub bars: usize,
    /// Trailing log returns used for correlation
    pub corr_lookback: usize,
    /// Trailing log prices used for the hedge ratio
    pub beta_lookback: usize,
    /// Rolling window for the spread z-score
    pub z_lookback: usize,
    /// |z| at or beyond which a row counts as entry ready
    pub entry_threshold: f64,
    /// Floor applied to every lookback before capping at the series length.
    /// 0 leaves each window at `min(lookback, len)`.
    pub min_window: usize,
    /// Only symbols quoted in this asset are screened
    pub quote_asset: String,
    /// Candidate symbols
    pub universe: Vec<String>,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            base: "BTCUSDT".to_string(),
            interval: "1h".to_string(),
            bars: 720,
            corr_lookback: 240,
            beta_lookback: 240,
            z_lookback: 240,
            entry_threshold: 2.0,
            min_window: 0,
            quote_asset: DEFAULT_QUOTE_ASSET.to_string(),
            universe: DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScreenerConfig {
    /// Create a new config with a custom base symbol
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into().trim().to_uppercase();
        self
    }

    /// Create a new config with a custom universe
    pub fn with_universe<I, S>(mut self, universe: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.universe = universe.into_iter().map(Into::into).collect();
        self
    }

    /// Create a new config with a floor under every lookback window
    pub fn with_min_window(mut self, min_window: usize) -> Self {
        self.min_window = min_window;
        self
    }

    /// Create a new config with custom entry threshold
    pub fn with_entry_threshold(mut self, threshold: f64) -> Self {
        self.entry_threshold = threshold;
        self
    }

    /// Effective window: `min(max(lookback, min_window), len)`
    pub fn effective_window(&self, lookback: usize, len: usize) -> usize {
        lookback.max(self.min_window).min(len)
    }

    /// Normalised candidate list.
    ///
    /// Trims and uppercases, drops empties and symbols outside the quote
    /// asset, drops the base, and removes duplicates keeping first position.
    pub fn candidates(&self) -> Vec<String> {
        let base = self.base.trim().to_uppercase();
        let quote = self.quote_asset.trim().to_uppercase();
        let mut out: Vec<String> = Vec::with_capacity(self.universe.len());
        for raw in &self.universe {
            let symbol = raw.trim().to_uppercase();
            if symbol.is_empty() || !symbol.ends_with(&quote) || symbol == base {
                continue;
            }
            if !out.contains(&symbol) {
                out.push(symbol);
            }
        }
        out
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.base.trim().is_empty() {
            return Err(ParamError::EmptySymbol("base"));
        }
        if self.bars == 0 {
            return Err(ParamError::InvalidBars(self.bars));
        }
        validate_lookback("corr_lookback", self.corr_lookback)?;
        validate_lookback("beta_lookback", self.beta_lookback)?;
        validate_lookback("z_lookback", self.z_lookback)?;
        validate_entry(self.entry_threshold)?;
        Ok(())
    }
}

fn validate_lookback(name: &'static str, value: usize) -> Result<(), ParamError> {
    if value < 2 {
        return Err(ParamError::InvalidLookback(name, value));
    }
    Ok(())
}

fn validate_entry(value: f64) -> Result<(), ParamError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ParamError::InvalidEntryThreshold(value));
    }
    Ok(())
}

/// Parameter validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("Invalid {0}: {1} (minimum 2)")]
    InvalidLookback(&'static str, usize),
    #[error("Invalid entry threshold: {0} (must be finite and > 0)")]
    InvalidEntryThreshold(f64),
    #[error("Invalid exit threshold: {0} (must be 0 <= exit < entry)")]
    InvalidExitThreshold(f64),
    #[error("Invalid bar count: {0} (must be > 0)")]
    InvalidBars(usize),
    #[error("Symbol '{0}' cannot be empty")]
    EmptySymbol(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_are_valid() {
        assert!(SignalConfig::default().validate().is_ok());
        assert!(ScreenerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_signal_config_builder() {
        let config = SignalConfig::default()
            .with_entry_threshold(2.5)
            .with_lookbacks(100, 50);
        assert_eq!(config.entry_threshold, 2.5);
        assert_eq!(config.beta_lookback, 100);
        assert_eq!(config.z_lookback, 50);
    }

    #[test]
    fn test_invalid_lookback() {
        let config = SignalConfig::default().with_lookbacks(1, 50);
        assert_eq!(config.validate(), Err(ParamError::InvalidLookback("beta_lookback", 1)));
    }

    #[test]
    fn test_invalid_thresholds() {
        let config = SignalConfig::default().with_entry_threshold(0.0);
        assert!(matches!(config.validate(), Err(ParamError::InvalidEntryThreshold(_))));

        let mut config = SignalConfig::default();
        config.exit_threshold = 2.5;
        assert!(matches!(config.validate(), Err(ParamError::InvalidExitThreshold(_))));
    }

    #[test]
    fn test_effective_window() {
        let config = ScreenerConfig::default();
        assert_eq!(config.effective_window(240, 719), 240);
        assert_eq!(config.effective_window(240, 120), 120);
        assert_eq!(config.effective_window(20, 300), 20);
        assert_eq!(config.effective_window(20, 10), 10);
    }

    #[test]
    fn test_effective_window_with_floor() {
        let config = ScreenerConfig::default().with_min_window(50);
        // Floor applies before the length cap
        assert_eq!(config.effective_window(10, 719), 50);
        assert_eq!(config.effective_window(10, 30), 30);
        assert_eq!(config.effective_window(240, 719), 240);
    }

    #[test]
    fn test_candidates_normalisation() {
        let config = ScreenerConfig::default()
            .with_base("btcusdt")
            .with_universe([" ethusdt", "BTCUSDT", "", "SOLBTC", "ETHUSDT", "linkusdt "]);
        assert_eq!(config.candidates(), vec!["ETHUSDT", "LINKUSDT"]);
    }
}
