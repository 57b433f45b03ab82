//! Ports Layer - Trait definitions for external collaborators
//!
//! Following hexagonal architecture, these traits abstract:
//! - Historical price bars (exchange REST)
//! - Outbound text notifications (chat bot)

pub mod market_data;
pub mod notifier;
pub mod mocks;

pub use market_data::{MarketDataError, PriceHistoryPort};
pub use notifier::{NotifierPort, NotifyError};
