//! In-memory port implementations for tests and offline runs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::PriceBar;
use super::market_data::{MarketDataError, PriceHistoryPort};
use super::notifier::{NotifierPort, NotifyError};

/// Build hourly bars from close prices, first bar opening at the epoch
pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    let start: DateTime<Utc> = Utc.timestamp_millis_opt(0).single().unwrap_or_default();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open_time = start + Duration::hours(i as i64);
            PriceBar {
                open_time,
                close_time: open_time + Duration::hours(1) - Duration::milliseconds(1),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1.0,
            }
        })
        .collect()
}

/// Mock price history that serves canned bars per symbol and records calls
#[derive(Debug, Default, Clone)]
pub struct MockPriceHistory {
    calls: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<HashMap<String, Result<Vec<PriceBar>, MarketDataError>>>>,
}

impl MockPriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to serve these closes for a symbol
    pub fn with_closes(self, symbol: &str, closes: &[f64]) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(symbol.to_string(), Ok(bars_from_closes(closes)));
        self
    }

    /// Builder method to make a symbol fail
    pub fn with_failure(self, symbol: &str, error: MarketDataError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(symbol.to_string(), Err(error));
        self
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceHistoryPort for MockPriceHistory {
    async fn fetch_price_history(
        &self,
        symbol: &str,
        _interval: &str,
        limit: usize,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Err(MarketDataError::NotFound(symbol.to_string())));
        response.map(|bars| {
            let skip = bars.len().saturating_sub(limit);
            bars[skip..].to_vec()
        })
    }
}

/// Mock notifier that records delivered messages
#[derive(Debug, Default, Clone)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<String>>>,
    fail_with: Option<NotifyError>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to make every delivery fail
    pub fn failing(mut self, error: NotifyError) -> Self {
        self.fail_with = Some(error);
        self
    }

    /// Messages delivered so far
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotifierPort for MockNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
