//! Calendar window during which the designated asset never takes profit

use chrono::{Datelike, NaiveDate};

use crate::config::StrategyConfig;

/// Inclusive month/day window, year ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockdownWindow {
    start: (u32, u32),
    end: (u32, u32),
}

impl LockdownWindow {
    pub fn new(start_month: u32, start_day: u32, end_month: u32, end_day: u32) -> Self {
        Self {
            start: (start_month, start_day),
            end: (end_month, end_day),
        }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(
            config.lockdown_start_month,
            config.lockdown_start_day,
            config.lockdown_end_month,
            config.lockdown_end_day,
        )
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let md = (date.month(), date.day());
        if self.start <= self.end {
            self.start <= md && md <= self.end
        } else {
            // Wraps the year boundary, e.g. Dec 20 .. Jan 10
            md >= self.start || md <= self.end
        }
    }
}

impl Default for LockdownWindow {
    fn default() -> Self {
        Self::from_config(&StrategyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_window_bounds() {
        let w = LockdownWindow::default();
        assert!(!w.contains(date(2025, 1, 24)));
        assert!(w.contains(date(2025, 1, 25)));
        assert!(w.contains(date(2025, 1, 31)));
        assert!(w.contains(date(2025, 2, 5)));
        assert!(!w.contains(date(2025, 2, 6)));
        assert!(!w.contains(date(2025, 7, 1)));
    }

    #[test]
    fn test_year_is_ignored() {
        let w = LockdownWindow::default();
        for year in [1999, 2024, 2031] {
            assert!(w.contains(date(year, 2, 1)));
        }
    }

    #[test]
    fn test_wrapping_window() {
        let w = LockdownWindow::new(12, 20, 1, 10);
        assert!(w.contains(date(2025, 12, 20)));
        assert!(w.contains(date(2025, 12, 31)));
        assert!(w.contains(date(2026, 1, 1)));
        assert!(w.contains(date(2026, 1, 10)));
        assert!(!w.contains(date(2026, 1, 11)));
        assert!(!w.contains(date(2025, 12, 19)));
    }
}
