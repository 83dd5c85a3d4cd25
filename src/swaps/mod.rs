/// Quotes and swap execution
///
/// `QuoteProvider` prices trades, `Executor` settles them. Amounts crossing
/// these traits are in UI units (tokens, SOL); raw integer amounts stay
/// inside `Quote`.
pub mod jupiter;
pub mod paper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::BotResult;

pub use jupiter::JupiterClient;
pub use paper::PaperExecutor;

/// Priced route between two mints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub input_mint: String,
    pub output_mint: String,
    /// Raw input amount (smallest units)
    pub in_amount: u64,
    /// Raw output amount (smallest units)
    pub out_amount: u64,
    pub in_decimals: u8,
    pub out_decimals: u8,
    pub price_impact_pct: f64,
    pub slippage_bps: u16,
}

impl Quote {
    pub fn in_amount_ui(&self) -> f64 {
        to_ui_amount(self.in_amount, self.in_decimals)
    }

    pub fn out_amount_ui(&self) -> f64 {
        to_ui_amount(self.out_amount, self.out_decimals)
    }

    /// Price of the non-`base_mint` side in units of `base_mint`
    ///
    /// None when the quote does not touch `base_mint` or either side is zero.
    pub fn price_in(&self, base_mint: &str) -> Option<f64> {
        let (base, token) = if self.input_mint == base_mint {
            (self.in_amount_ui(), self.out_amount_ui())
        } else if self.output_mint == base_mint {
            (self.out_amount_ui(), self.in_amount_ui())
        } else {
            return None;
        };
        if base <= 0.0 || token <= 0.0 {
            return None;
        }
        Some(base / token)
    }
}

pub fn to_ui_amount(raw: u64, decimals: u8) -> f64 {
    raw as f64 / 10f64.powi(decimals as i32)
}

/// UI amount to raw units, rounded down so a sell never exceeds the holding
pub fn to_raw_amount(ui: f64, decimals: u8) -> u64 {
    if ui <= 0.0 || !ui.is_finite() {
        return 0;
    }
    (ui * 10f64.powi(decimals as i32)).floor() as u64
}

/// Source of quotes and current prices
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Quote swapping `amount` (UI units of `input_mint`) into `output_mint`
    async fn quote(&self, input_mint: &str, output_mint: &str, amount: f64) -> BotResult<Quote>;

    /// Current price of `asset_id` in SOL per token
    async fn current_price(&self, asset_id: &str) -> BotResult<f64>;
}

/// Settles trades and moves funds for the trading wallet
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute the quoted swap; returns the settled output amount (UI units)
    async fn swap(&self, quote: &Quote) -> BotResult<f64>;

    /// Send SOL to `to`
    async fn transfer(&self, to: &str, amount_sol: f64) -> BotResult<()>;

    async fn sol_balance(&self) -> BotResult<f64>;

    async fn token_balance(&self, asset_id: &str) -> BotResult<f64>;

    /// Close the (empty) token account for `asset_id` to reclaim rent
    async fn close_token_account(&self, asset_id: &str) -> BotResult<()>;
}
