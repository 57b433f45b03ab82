//! Binance kline wire format
//!
//! `/api/v3/klines` returns an array of arrays:
//! `[openTime, open, high, low, close, volume, closeTime, ...]`, where
//! times are epoch milliseconds and prices are decimal strings.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::PriceBar;
use crate::ports::MarketDataError;

const OPEN_TIME: usize = 0;
const OPEN: usize = 1;
const HIGH: usize = 2;
const LOW: usize = 3;
const CLOSE: usize = 4;
const VOLUME: usize = 5;
const CLOSE_TIME: usize = 6;

/// Parse a full klines response body
pub fn parse_klines(body: &Value) -> Result<Vec<PriceBar>, MarketDataError> {
    let rows = body
        .as_array()
        .ok_or_else(|| MarketDataError::Parse("klines response is not an array".into()))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let fields = row
                .as_array()
                .ok_or_else(|| MarketDataError::Parse(format!("kline {} is not an array", i)))?;
            parse_kline(fields).map_err(|e| MarketDataError::Parse(format!("kline {}: {}", i, e)))
        })
        .collect()
}

/// Parse one kline row
pub fn parse_kline(fields: &[Value]) -> Result<PriceBar, String> {
    if fields.len() <= CLOSE_TIME {
        return Err(format!("expected at least {} fields, got {}", CLOSE_TIME + 1, fields.len()));
    }

    let bar = PriceBar {
        open_time: millis(&fields[OPEN_TIME])?,
        close_time: millis(&fields[CLOSE_TIME])?,
        open: number(&fields[OPEN])?,
        high: number(&fields[HIGH])?,
        low: number(&fields[LOW])?,
        close: number(&fields[CLOSE])?,
        volume: number(&fields[VOLUME])?,
    };

    if !bar.is_valid() {
        return Err("non-finite price or close time not after open time".into());
    }
    Ok(bar)
}

/// Number from either a JSON number or a decimal string
fn number(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("unrepresentable number {}", n)),
        Value::String(s) => s.parse::<f64>().map_err(|e| format!("invalid number '{}': {}", s, e)),
        other => Err(format!("expected number, got {}", other)),
    }
}

fn millis(value: &Value) -> Result<DateTime<Utc>, String> {
    let ms = number(value)?;
    DateTime::from_timestamp_millis(ms as i64).ok_or_else(|| format!("timestamp out of range: {}", ms))
}
