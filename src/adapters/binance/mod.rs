//! Binance Adapter
//!
//! Historical kline retrieval over the public REST API, with failover
//! across the mirror hosts.

mod client;
mod types;

pub use client::{BinanceClient, BinanceConfig, BINANCE_HOSTS};
pub use types::{parse_kline, parse_klines};
