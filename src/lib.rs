//! Spreadwatch - Statistical-arbitrage pair signals for crypto
//!
//! Hedge ratio, spread z-score and a cointegration screener over exchange
//! price history, with threshold-crossing alerts.
//!
//! # Modules
//!
//! - `domain`: Value types (PriceBar, PairSignal, ScreenerRow)
//! - `strategy`: Numeric core (stats, OLS, ADF, pair signal, screener, alerts)
//! - `ports`: Trait abstractions (PriceHistoryPort, NotifierPort)
//! - `adapters`: External implementations (Binance, Telegram, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Scan service and pair monitor

pub mod domain;
pub mod ports;
pub mod strategy;
pub mod adapters;
pub mod config;
pub mod application;
