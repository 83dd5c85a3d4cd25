/// Exit policy configuration
///
/// Defaults encode the production ladder: tiers at +25% / +50% / +100%
/// selling 20% / 30% / 25% of the remaining amount, a 15% moonbag trailing
/// stop, and the designated-asset conviction hold (30% trailing stop, 50% out
/// at 5x, profit-taking suspended from Jan 25 through Feb 5).
use crate::config_struct;

config_struct! {
    pub struct StrategyConfig {
        /// Mint held under the conviction policy (empty = none)
        designated_asset: String = String::new(),

        designated_trailing_stop: f64 = 0.30,
        designated_target_gain: f64 = 5.0,
        designated_target_sell_fraction: f64 = 0.50,

        /// Lockdown window bounds, inclusive, month/day only
        lockdown_start_month: u32 = 1,
        lockdown_start_day: u32 = 25,
        lockdown_end_month: u32 = 2,
        lockdown_end_day: u32 = 5,

        tier1_gain: f64 = 0.25,
        tier1_sell_fraction: f64 = 0.20,
        tier2_gain: f64 = 0.50,
        tier2_sell_fraction: f64 = 0.30,
        tier3_gain: f64 = 1.00,
        tier3_sell_fraction: f64 = 0.25,

        /// Drop from the high-water mark that closes the moonbag
        moonbag_trailing_stop: f64 = 0.15,
    }
}

impl StrategyConfig {
    pub fn designated_asset(&self) -> Option<&str> {
        let asset = self.designated_asset.trim();
        if asset.is_empty() {
            None
        } else {
            Some(asset)
        }
    }
}
