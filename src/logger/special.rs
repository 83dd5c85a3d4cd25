//! Special logging functions for specific use cases

use super::tags::LogTag;
use crate::logger;

/// Log a price observation for an open position
///
/// Shown at DEBUG under the Positions tag; includes the distance from the
/// high-water mark held before this observation and the unrealized gain
/// against entry. ▲ marks a new high.
pub fn log_price_change(asset_id: &str, high_price: f64, new_price: f64, entry_price: f64) {
    logger::debug(
        LogTag::Positions,
        &price_change_line(asset_id, high_price, new_price, entry_price),
    );
}

fn price_change_line(asset_id: &str, high_price: f64, new_price: f64, entry_price: f64) -> String {
    let vs_high = percent_change(high_price, new_price);
    let gain_pct = percent_change(entry_price, new_price);
    let arrow = if vs_high > 0.0 {
        "▲"
    } else if vs_high < 0.0 {
        "▼"
    } else {
        "="
    };

    format!(
        "{} {} {:.10} SOL | vs high {:+.2}% | vs entry {:+.2}%",
        arrow,
        short_id(asset_id),
        new_price,
        vs_high,
        gain_pct
    )
}

fn percent_change(from: f64, to: f64) -> f64 {
    if from > 0.0 {
        (to - from) / from * 100.0
    } else {
        0.0
    }
}

/// First 4 and last 4 characters of a mint
pub fn short_id(asset_id: &str) -> String {
    let chars: Vec<char> = asset_id.chars().collect();
    if chars.len() <= 10 {
        return asset_id.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_line_is_relative_to_high() {
        let line = price_change_line("mintA", 2.0, 1.5, 1.0);
        assert_eq!(line, "▼ mintA 1.5000000000 SOL | vs high -25.00% | vs entry +50.00%");

        let line = price_change_line("mintA", 2.0, 3.0, 1.0);
        assert!(line.starts_with("▲"));
    }

    #[test]
    fn test_price_line_without_history() {
        let line = price_change_line("mintA", 0.0, 1.0, 0.0);
        assert!(line.contains("vs high +0.00%"));
        assert!(line.contains("vs entry +0.00%"));
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("So11111111111111111111111111111111111111112"), "So11…1112");
    }
}
