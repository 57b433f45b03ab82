//! Telegram Adapter
//!
//! Delivers alert text through a bot's `sendMessage` endpoint.

mod client;

pub use client::{TelegramConfig, TelegramNotifier, TELEGRAM_API_BASE};
