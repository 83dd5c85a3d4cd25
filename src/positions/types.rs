use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::strategy::{ExitContext, Tier, TierFlags};
use chrono::NaiveDate;

/// An open holding of one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub asset_id: String,
    /// SOL per token at acquisition
    pub entry_price: f64,
    /// Tokens currently held
    pub amount: f64,
    /// High-water mark since entry
    pub highest_price: f64,
    #[serde(flatten)]
    pub tier_flags: TierFlags,
    pub opened_at: DateTime<Utc>,
}

impl Position {
    pub fn new(asset_id: impl Into<String>, entry_price: f64, amount: f64) -> Self {
        Self {
            asset_id: asset_id.into(),
            entry_price,
            amount,
            highest_price: entry_price,
            tier_flags: TierFlags::default(),
            opened_at: Utc::now(),
        }
    }

    /// Raise the high-water mark; returns true when it moved
    pub fn observe_price(&mut self, price: f64) -> bool {
        if price > self.highest_price {
            self.highest_price = price;
            true
        } else {
            false
        }
    }

    /// Record a settled sell. Returns the remaining amount.
    pub fn apply_sell(&mut self, sold_amount: f64, tier: Option<Tier>) -> f64 {
        self.amount = (self.amount - sold_amount).max(0.0);
        if let Some(tier) = tier {
            self.tier_flags.mark_sold(tier);
        }
        self.amount
    }

    pub fn exit_context(&self, current_price: f64, today: NaiveDate) -> ExitContext<'_> {
        ExitContext {
            asset_id: &self.asset_id,
            current_price,
            entry_price: self.entry_price,
            highest_price: self.highest_price,
            tiers: self.tier_flags,
            today,
        }
    }

    pub fn unrealized_pnl_pct(&self, current_price: f64) -> f64 {
        if self.entry_price <= 0.0 {
            return 0.0;
        }
        (current_price / self.entry_price - 1.0) * 100.0
    }
}
