//! Application Layer - Services wiring the strategy to the ports
//!
//! - `scanner`: concurrent screener scan over a price history port
//! - `pair_monitor`: pair evaluation, crossing alerts and notification

pub mod scanner;
pub mod pair_monitor;

pub use scanner::{ScanError, ScanReport, ScanService};
pub use pair_monitor::{evaluate_pair, AlertReport, MonitorError, PairMonitor, PairSpec};
