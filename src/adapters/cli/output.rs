//! Text rendering for CLI output
//!
//! JSON output goes through serde directly; these helpers produce the
//! human-readable tables and summaries.

use std::fmt::Write as _;

use crate::application::{AlertReport, PairSpec, ScanReport};
use crate::domain::{PairSignal, ScreenerRow};
use crate::strategy::best_opportunity;

fn opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

fn pass(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

/// Screener table followed by the best opportunity
pub fn render_scan(report: &ScanReport, rows: &[ScreenerRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Base {} | {} bars | entry |z| >= {} | {}",
        report.base,
        report.interval,
        report.entry_threshold,
        report.scanned_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(
        out,
        "{:<12} {:>7} {:>8} {:>8} {:>6} {:>7} {:>7}  {:<9} {}",
        "SYMBOL", "CORR", "BETA", "ADF t", "5%", "Z", "|Z|max", "STATUS", "NOTE"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<12} {:>7} {:>8} {:>8} {:>6} {:>7} {:>7}  {:<9} {}",
            row.symbol,
            opt(row.correlation, 3),
            opt(row.hedge_ratio, 3),
            opt(row.adf_t_stat, 2),
            pass(row.coint_pass_5),
            opt(row.z_now, 2),
            opt(row.z_max_abs, 2),
            row.status.to_string(),
            row.note
        );
    }

    match best_opportunity(rows) {
        Some(best) => {
            let _ = writeln!(out, "\nBest: {} ({}, z={})", best.symbol, best.note, opt(best.z_now, 2));
        }
        None => {
            let _ = writeln!(out, "\nNo rows to display");
        }
    }
    out
}

/// Pair signal summary
pub fn render_signal(pair: &PairSpec, signal: &PairSignal) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pair:        {} / {} ({})", pair.symbol_a, pair.symbol_b, pair.interval);
    let _ = writeln!(out, "Hedge ratio: {:.4}", signal.hedge_ratio);
    let _ = writeln!(out, "Spread:      {:.6}", signal.spread);
    let _ = writeln!(
        out,
        "Rolling:     mean {} / std {} (window {})",
        opt(signal.rolling_mean, 6),
        opt(signal.rolling_std, 6),
        signal.z_window
    );
    let _ = writeln!(out, "Z-score:     {}", opt(signal.z_score, 2));
    let _ = writeln!(out, "Confidence:  {}", opt(signal.confidence.map(|c| c * 100.0), 1));
    let _ = writeln!(
        out,
        "Action:      {} (entry {}, exit {})",
        signal.action.describe(&pair.symbol_a, &pair.symbol_b),
        signal.entry_threshold,
        signal.exit_threshold
    );
    if signal.is_inside_exit_band() {
        let _ = writeln!(out, "             |z| inside exit band");
    }
    out
}

/// Alert cycle summary
pub fn render_alert(pair: &PairSpec, report: &AlertReport, dry_run: bool) -> String {
    let mut out = render_signal(pair, &report.signal);
    if report.messages.is_empty() {
        let _ = writeln!(out, "No crossings on the latest bar");
        return out;
    }
    let verb = if dry_run { "Would send" } else { "Sent" };
    let _ = writeln!(out, "{} {} message(s):", verb, report.messages.len());
    for message in &report.messages {
        let _ = writeln!(out, "  {}", message);
    }
    if !dry_run && report.delivered < report.messages.len() {
        let _ = writeln!(
            out,
            "{} of {} message(s) failed to deliver",
            report.messages.len() - report.delivered,
            report.messages.len()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::domain::{RowNote, StatusTier, TradeAction};

    fn report(rows: Vec<ScreenerRow>) -> ScanReport {
        ScanReport {
            base: "BTCUSDT".into(),
            interval: "1h".into(),
            entry_threshold: 2.0,
            scanned_at: Utc::now(),
            rows,
        }
    }

    fn strong_row() -> ScreenerRow {
        ScreenerRow {
            symbol: "ETHUSDT".into(),
            correlation: Some(0.9531),
            hedge_ratio: Some(1.2481),
            adf_t_stat: Some(-9.61),
            coint_pass_5: Some(true),
            z_now: Some(2.4),
            z_max_abs: Some(2.9),
            status: StatusTier::Strong,
            note: RowNote::StrongEntryReady,
        }
    }

    #[test]
    fn test_render_scan_table() {
        let rows = vec![strong_row(), ScreenerRow::fetch_failed("OPUSDT")];
        let text = render_scan(&report(rows.clone()), &rows);

        assert!(text.contains("ETHUSDT"));
        assert!(text.contains("0.953"));
        assert!(text.contains("STRONG"));
        assert!(text.contains("fetch failed"));
        assert!(text.contains("Best: ETHUSDT (STRONG + entry ready, z=2.40)"));
    }

    #[test]
    fn test_render_empty_scan() {
        let text = render_scan(&report(Vec::new()), &[]);
        assert!(text.contains("No rows to display"));
    }

    #[test]
    fn test_render_signal_without_z() {
        let signal = PairSignal {
            hedge_ratio: 1.0,
            spread: 0.0,
            rolling_mean: Some(0.0),
            rolling_std: Some(0.0),
            z_score: None,
            action: TradeAction::Wait,
            confidence: None,
            entry_threshold: 2.0,
            exit_threshold: 0.7,
            z_window: 168,
            spread_series: vec![0.0; 10],
            z_series: vec![None; 10],
        };
        let pair = PairSpec::new("BTCUSDT", "ETHUSDT", "1h", 500);
        let text = render_signal(&pair, &signal);
        assert!(text.contains("Z-score:     -"));
        assert!(text.contains("Action:      WAIT"));
    }
}
