//! Exit policy: deterministic sell/hold decision for one position
//!
//! The designated asset follows a conviction hold (wide trailing stop, a
//! single partial exit at the target multiple, profit-taking suspended
//! during the lockdown window). Every other asset walks the three-tier
//! ladder and keeps a moonbag protected by a trailing stop once tier 3 fired.

use crate::config::StrategyConfig;

use super::lockdown::LockdownWindow;
use super::types::{ExitContext, ExitDecision, ExitReason, Tier};

#[derive(Debug, Clone)]
pub struct ExitPolicy {
    config: StrategyConfig,
    lockdown: LockdownWindow,
}

impl ExitPolicy {
    pub fn new(config: StrategyConfig) -> Self {
        let lockdown = LockdownWindow::from_config(&config);
        Self { config, lockdown }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn is_designated(&self, asset_id: &str) -> bool {
        self.config.designated_asset() == Some(asset_id)
    }

    /// One action per call; fractions apply to the current amount
    pub fn decide(&self, ctx: &ExitContext<'_>) -> ExitDecision {
        if self.is_designated(ctx.asset_id) {
            self.decide_designated(ctx)
        } else {
            self.decide_standard(ctx)
        }
    }

    fn decide_designated(&self, ctx: &ExitContext<'_>) -> ExitDecision {
        let cfg = &self.config;

        // Stop-loss stays armed inside the lockdown window
        if ctx.drop_from_high() >= cfg.designated_trailing_stop {
            return ExitDecision::sell(1.0, ExitReason::TrailingStopHit);
        }
        if self.lockdown.contains(ctx.today) {
            return ExitDecision::hold(ExitReason::LockdownMode);
        }
        if ctx.gain_fraction() >= cfg.designated_target_gain {
            return ExitDecision::sell(cfg.designated_target_sell_fraction, ExitReason::TargetHit);
        }
        ExitDecision::hold(ExitReason::Holding)
    }

    fn decide_standard(&self, ctx: &ExitContext<'_>) -> ExitDecision {
        let cfg = &self.config;
        let gain = ctx.gain_fraction();

        let ladder = [
            (Tier::One, cfg.tier1_gain, cfg.tier1_sell_fraction),
            (Tier::Two, cfg.tier2_gain, cfg.tier2_sell_fraction),
            (Tier::Three, cfg.tier3_gain, cfg.tier3_sell_fraction),
        ];
        for (tier, threshold, fraction) in ladder {
            if gain >= threshold && !ctx.tiers.is_sold(tier) {
                return ExitDecision::sell(fraction, ExitReason::TierProfit(tier));
            }
        }

        if ctx.tiers.tier3_sold && ctx.drop_from_high() >= cfg.moonbag_trailing_stop {
            return ExitDecision::sell(1.0, ExitReason::MoonbagTrailingStop);
        }

        ExitDecision::hold(ExitReason::Holding)
    }
}
