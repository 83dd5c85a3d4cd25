// Config schema submodule - one file per configuration area

use crate::config_struct;

mod apis;
mod services;
mod strategy;
mod trader;

pub use apis::*;
pub use services::*;
pub use strategy::*;
pub use trader::*;

/// Wrapped SOL mint, the quote currency for every trade
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration structure containing all sub-configurations
    pub struct Config {
        /// Scheduler, sizing limits and treasury routing
        trader: TraderConfig = TraderConfig::default(),

        /// Exit policy thresholds
        strategy: StrategyConfig = StrategyConfig::default(),

        /// Position sizing and profit tax
        money: MoneyConfig = MoneyConfig::default(),

        /// Jupiter quote/price/token API
        jupiter: JupiterConfig = JupiterConfig::default(),

        /// Rugcheck risk reports
        rugcheck: RugcheckConfig = RugcheckConfig::default(),

        /// Simulated execution wallet
        paper: PaperConfig = PaperConfig::default(),

        /// Telegram notifications
        telegram: TelegramConfig = TelegramConfig::default(),

        /// Admin HTTP API
        webserver: WebserverConfig = WebserverConfig::default(),
    }
}

impl Config {
    /// Reject values the trading loop cannot run with
    pub fn validate(&self) -> Result<(), crate::errors::BotError> {
        super::utils::validate_config(self)
    }
}
