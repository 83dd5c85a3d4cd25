/// Simulated wallet: settles quotes at their quoted amounts
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{Executor, Quote};
use crate::config::SOL_MINT;
use crate::errors::{BotError, BotResult};
use crate::logger::{self, LogTag};

/// Tolerance when comparing a requested sell against the held balance
const BALANCE_EPSILON: f64 = 1e-9;

#[derive(Debug, Default)]
struct PaperWallet {
    sol: f64,
    tokens: HashMap<String, f64>,
    transfers: Vec<(String, f64)>,
}

pub struct PaperExecutor {
    wallet: Mutex<PaperWallet>,
}

impl PaperExecutor {
    pub fn new(starting_balance_sol: f64) -> Self {
        logger::info(
            LogTag::Wallet,
            &format!("Paper wallet started with {:.4} SOL", starting_balance_sol),
        );
        Self {
            wallet: Mutex::new(PaperWallet {
                sol: starting_balance_sol,
                ..PaperWallet::default()
            }),
        }
    }

    /// Treasury transfers made so far
    pub async fn transfers(&self) -> Vec<(String, f64)> {
        self.wallet.lock().await.transfers.clone()
    }
}

#[async_trait]
impl Executor for PaperExecutor {
    async fn swap(&self, quote: &Quote) -> BotResult<f64> {
        let amount_in = quote.in_amount_ui();
        let amount_out = quote.out_amount_ui();
        let mut wallet = self.wallet.lock().await;

        if quote.input_mint == SOL_MINT {
            if wallet.sol + BALANCE_EPSILON < amount_in {
                return Err(BotError::InsufficientFunds {
                    needed: amount_in,
                    available: wallet.sol,
                });
            }
            wallet.sol -= amount_in;
            *wallet.tokens.entry(quote.output_mint.clone()).or_insert(0.0) += amount_out;
        } else {
            let held = wallet.tokens.get(&quote.input_mint).copied().unwrap_or(0.0);
            if held + BALANCE_EPSILON < amount_in {
                return Err(BotError::Execution(format!(
                    "paper wallet holds {} of {}, cannot sell {}",
                    held, quote.input_mint, amount_in
                )));
            }
            wallet
                .tokens
                .insert(quote.input_mint.clone(), (held - amount_in).max(0.0));
            if quote.output_mint == SOL_MINT {
                wallet.sol += amount_out;
            } else {
                *wallet.tokens.entry(quote.output_mint.clone()).or_insert(0.0) += amount_out;
            }
        }

        logger::debug(
            LogTag::Swap,
            &format!(
                "Paper swap {} {} → {} {}",
                amount_in, quote.input_mint, amount_out, quote.output_mint
            ),
        );
        Ok(amount_out)
    }

    async fn transfer(&self, to: &str, amount_sol: f64) -> BotResult<()> {
        if to.is_empty() {
            return Err(BotError::InvalidInput("transfer destination is empty".to_string()));
        }
        let mut wallet = self.wallet.lock().await;
        if wallet.sol + BALANCE_EPSILON < amount_sol {
            return Err(BotError::InsufficientFunds {
                needed: amount_sol,
                available: wallet.sol,
            });
        }
        wallet.sol -= amount_sol;
        wallet.transfers.push((to.to_string(), amount_sol));
        Ok(())
    }

    async fn sol_balance(&self) -> BotResult<f64> {
        Ok(self.wallet.lock().await.sol)
    }

    async fn token_balance(&self, asset_id: &str) -> BotResult<f64> {
        Ok(self
            .wallet
            .lock()
            .await
            .tokens
            .get(asset_id)
            .copied()
            .unwrap_or(0.0))
    }

    async fn close_token_account(&self, asset_id: &str) -> BotResult<()> {
        let mut wallet = self.wallet.lock().await;
        match wallet.tokens.get(asset_id).copied() {
            Some(balance) if balance > 0.0 => Err(BotError::Execution(format!(
                "token account for {} still holds {}",
                asset_id, balance
            ))),
            _ => {
                wallet.tokens.remove(asset_id);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buy(mint: &str, sol_raw: u64, tokens_raw: u64) -> Quote {
        Quote {
            input_mint: SOL_MINT.to_string(),
            output_mint: mint.to_string(),
            in_amount: sol_raw,
            out_amount: tokens_raw,
            in_decimals: 9,
            out_decimals: 6,
            price_impact_pct: 0.0,
            slippage_bps: 50,
        }
    }

    fn sell(mint: &str, tokens_raw: u64, sol_raw: u64) -> Quote {
        Quote {
            input_mint: mint.to_string(),
            output_mint: SOL_MINT.to_string(),
            in_amount: tokens_raw,
            out_amount: sol_raw,
            in_decimals: 6,
            out_decimals: 9,
            price_impact_pct: 0.0,
            slippage_bps: 50,
        }
    }

    #[tokio::test]
    async fn test_buy_then_sell_all() {
        let exec = PaperExecutor::new(1.0);
        let got = exec.swap(&buy("mint", 250_000_000, 5_000_000)).await.unwrap();
        assert_eq!(got, 5.0);
        assert_eq!(exec.sol_balance().await.unwrap(), 0.75);
        assert_eq!(exec.token_balance("mint").await.unwrap(), 5.0);

        exec.swap(&sell("mint", 5_000_000, 500_000_000)).await.unwrap();
        assert_eq!(exec.sol_balance().await.unwrap(), 1.25);
        assert_eq!(exec.token_balance("mint").await.unwrap(), 0.0);
        exec.close_token_account("mint").await.unwrap();
    }

    #[tokio::test]
    async fn test_overspend_rejected() {
        let exec = PaperExecutor::new(0.1);
        let err = exec.swap(&buy("mint", 200_000_000, 1)).await.unwrap_err();
        assert!(matches!(err, BotError::InsufficientFunds { .. }));
        assert!(exec.swap(&sell("other", 1, 1)).await.is_err());
    }

    #[tokio::test]
    async fn test_transfer_and_close_guard() {
        let exec = PaperExecutor::new(1.0);
        exec.transfer("treasury", 0.25).await.unwrap();
        assert_eq!(exec.transfers().await, vec![("treasury".to_string(), 0.25)]);
        assert!(exec.transfer("", 0.1).await.is_err());

        exec.swap(&buy("mint", 100_000_000, 1_000_000)).await.unwrap();
        assert!(exec.close_token_account("mint").await.is_err());
    }
}
