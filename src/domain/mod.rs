//! Domain Layer - Value types produced and consumed by the signal pipeline
//!
//! Pure data with no I/O. Every value here is built fresh per evaluation
//! or scan and owned by whoever requested it.

pub mod price_bar;
pub mod signal;
pub mod screener_row;

pub use price_bar::{closes, PriceBar};
pub use signal::{PairSignal, TradeAction};
pub use screener_row::{RowNote, ScreenerRow, StatusTier};
