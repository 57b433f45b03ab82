//! Z-score crossing alerts
//!
//! Compares the previous and current z-score of a pair and reports which
//! bands were crossed on the latest bar. Several alerts may fire at once.

use serde::{Deserialize, Serialize};

/// Alert bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertRules {
    /// Entry band, crossed outward
    pub entry: f64,
    /// Exit band, crossed inward
    pub exit: f64,
    /// Risk band, crossed outward
    pub risk: f64,
}

impl Default for AlertRules {
    fn default() -> Self {
        Self {
            entry: 2.0,
            exit: 0.7,
            risk: 3.0,
        }
    }
}

/// A band crossing on the latest bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// z rose through +entry: short A / long B
    EntryShort,
    /// z fell through -entry: long A / short B
    EntryLong,
    /// |z| came back inside the exit band
    Exit,
    /// |z| reached the risk band
    Risk,
}

/// Crossing plus the z-score that triggered it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub z: f64,
}

impl AlertEvent {
    /// Notification text, e.g. `ENTRY SHORT BTCUSDT / LONG ETHUSDT | z=2.13`
    pub fn message(&self, symbol_a: &str, symbol_b: &str) -> String {
        let label = match self.kind {
            AlertKind::EntryShort => format!("ENTRY SHORT {} / LONG {}", symbol_a, symbol_b),
            AlertKind::EntryLong => format!("ENTRY LONG {} / SHORT {}", symbol_a, symbol_b),
            AlertKind::Exit => "EXIT".to_string(),
            AlertKind::Risk => "RISK".to_string(),
        };
        format!("{} | z={:.2}", label, self.z)
    }
}

/// Crossings between `prev` and `cur`; nothing fires unless both are finite
pub fn detect_crossings(prev: Option<f64>, cur: Option<f64>, rules: &AlertRules) -> Vec<AlertEvent> {
    let (prev, cur) = match (prev, cur) {
        (Some(p), Some(c)) if p.is_finite() && c.is_finite() => (p, c),
        _ => return Vec::new(),
    };

    let mut events = Vec::new();
    let mut push = |kind| events.push(AlertEvent { kind, z: cur });

    if prev < rules.entry && cur >= rules.entry {
        push(AlertKind::EntryShort);
    }
    if prev > -rules.entry && cur <= -rules.entry {
        push(AlertKind::EntryLong);
    }
    if prev.abs() > rules.exit && cur.abs() <= rules.exit {
        push(AlertKind::Exit);
    }
    if prev.abs() < rules.risk && cur.abs() >= rules.risk {
        push(AlertKind::Risk);
    }
    events
}
