use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Profit-taking tier of the standard ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    One,
    Two,
    Three,
}

/// Which tiers have already fired for a position. Each flag flips once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierFlags {
    pub tier1_sold: bool,
    pub tier2_sold: bool,
    pub tier3_sold: bool,
}

impl TierFlags {
    pub fn is_sold(&self, tier: Tier) -> bool {
        match tier {
            Tier::One => self.tier1_sold,
            Tier::Two => self.tier2_sold,
            Tier::Three => self.tier3_sold,
        }
    }

    pub fn mark_sold(&mut self, tier: Tier) {
        match tier {
            Tier::One => self.tier1_sold = true,
            Tier::Two => self.tier2_sold = true,
            Tier::Three => self.tier3_sold = true,
        }
    }
}

/// Why the exit policy sold or held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    TrailingStopHit,
    LockdownMode,
    TargetHit,
    Holding,
    TierProfit(Tier),
    MoonbagTrailingStop,
}

impl ExitReason {
    /// Tier flag to set once a sell with this reason settles
    pub fn tier(&self) -> Option<Tier> {
        match self {
            ExitReason::TierProfit(tier) => Some(*tier),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::TrailingStopHit => "Trailing Stop Hit",
            ExitReason::LockdownMode => "Lockdown Mode",
            ExitReason::TargetHit => "Target Hit",
            ExitReason::Holding => "Holding",
            ExitReason::TierProfit(Tier::One) => "Tier 1 Profit",
            ExitReason::TierProfit(Tier::Two) => "Tier 2 Profit",
            ExitReason::TierProfit(Tier::Three) => "Tier 3 Profit",
            ExitReason::MoonbagTrailingStop => "Moonbag Trailing Stop",
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for one policy evaluation
#[derive(Debug, Clone, Copy)]
pub struct ExitContext<'a> {
    pub asset_id: &'a str,
    pub current_price: f64,
    pub entry_price: f64,
    pub highest_price: f64,
    pub tiers: TierFlags,
    pub today: NaiveDate,
}

impl ExitContext<'_> {
    /// Fractional gain over entry; 0 when the entry price is not positive
    pub fn gain_fraction(&self) -> f64 {
        if self.entry_price <= 0.0 {
            return 0.0;
        }
        (self.current_price - self.entry_price) / self.entry_price
    }

    /// Fractional drop from the high-water mark; 0 when no mark exists
    pub fn drop_from_high(&self) -> f64 {
        if self.highest_price <= 0.0 {
            return 0.0;
        }
        (self.highest_price - self.current_price) / self.highest_price
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitDecision {
    pub should_sell: bool,
    /// Fraction of the current amount to sell, in [0, 1]
    pub sell_fraction: f64,
    pub reason: ExitReason,
}

impl ExitDecision {
    pub fn hold(reason: ExitReason) -> Self {
        Self {
            should_sell: false,
            sell_fraction: 0.0,
            reason,
        }
    }

    pub fn sell(fraction: f64, reason: ExitReason) -> Self {
        Self {
            should_sell: true,
            sell_fraction: fraction.clamp(0.0, 1.0),
            reason,
        }
    }

    pub fn is_full_exit(&self) -> bool {
        self.should_sell && self.sell_fraction >= 1.0
    }
}
