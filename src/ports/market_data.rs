//! Price history port
//!
//! Contract with the bar-retrieval collaborator. Failures are per symbol;
//! callers decide whether a failure is fatal (base symbol) or recorded on a
//! row (screened candidate).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::PriceBar;

/// Market data error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    #[error("HTTP error via {host}: {message}")]
    Http { host: String, message: String },

    #[error("REST API error {status} via {host}")]
    Status { host: String, status: u16 },

    #[error("Data parsing error: {0}")]
    Parse(String),

    #[error("All hosts failed, last error: {0}")]
    AllHostsFailed(String),

    #[error("No price history for symbol: {0}")]
    NotFound(String),
}

/// Historical bar retrieval
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceHistoryPort: Send + Sync {
    /// Up to `limit` bars for `symbol`, ordered oldest to newest.
    /// `interval` is an opaque bar-duration code such as `1h`.
    async fn fetch_price_history(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<PriceBar>, MarketDataError>;
}
