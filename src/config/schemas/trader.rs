/// Trading loop and money management configuration
use crate::config_struct;

use super::SOL_MINT;

config_struct! {
    /// Scheduler and acquisition configuration
    pub struct TraderConfig {
        /// Start with trading active (false = start paused)
        enabled: bool = true,

        /// Seconds between the end of one scan+manage pass and the next
        cycle_interval_secs: u64 = 60,

        /// Upper bound for any single collaborator call
        call_timeout_secs: u64 = 15,

        /// Skip new candidates once this many positions are open
        max_open_positions: usize = 10,

        /// Wallet receiving the profit tax (base58)
        treasury_address: String = String::new(),

        /// Quote currency mint
        base_mint: String = SOL_MINT.to_string(),

        /// Slippage tolerance for swap quotes
        slippage_bps: u16 = 50,
    }
}

config_struct! {
    /// Position sizing and profit tax
    pub struct MoneyConfig {
        /// Fraction of the SOL balance committed to each new position
        position_size_pct: f64 = 0.10,

        /// Fraction of positive realized profit routed to the treasury
        tax_rate: f64 = 0.20,

        /// Smallest trade worth executing, in SOL
        min_trade_size_sol: f64 = 0.01,

        /// Remaining token amount at or below which a position is closed
        dust_threshold: f64 = 0.0001,
    }
}
