//! Scan cycle: discover, screen, size, buy, open the position

use std::fmt;

use super::manager::append_record;
use super::TraderContext;
use crate::errors::BotResult;
use crate::logger::{self, short_id, LogTag};
use crate::notifications::{dispatch, Notification};
use crate::positions::{Position, PositionStore};
use crate::trade_log::TradeRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    pub candidates: usize,
    pub opened: Vec<String>,
    pub rejected: Vec<(String, Rejection)>,
}

/// Why a candidate was not bought
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    AlreadyHeld,
    MaxPositions(usize),
    NoRiskReport,
    RiskTooHigh(f64),
    RiskCheckFailed(String),
    BalanceUnavailable(String),
    BelowMinimum(f64),
    QuoteFailed(String),
    ZeroOutput,
    ExecutionFailed(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::AlreadyHeld => write!(f, "already held"),
            Rejection::MaxPositions(max) => write!(f, "open position limit {} reached", max),
            Rejection::NoRiskReport => write!(f, "no risk report"),
            Rejection::RiskTooHigh(score) => write!(f, "risk score {} too high", score),
            Rejection::RiskCheckFailed(e) => write!(f, "risk check failed: {}", e),
            Rejection::BalanceUnavailable(e) => write!(f, "balance unavailable: {}", e),
            Rejection::BelowMinimum(size) => write!(f, "position size {:.6} SOL below minimum", size),
            Rejection::QuoteFailed(e) => write!(f, "quote failed: {}", e),
            Rejection::ZeroOutput => write!(f, "quote returned no output"),
            Rejection::ExecutionFailed(e) => write!(f, "buy failed: {}", e),
        }
    }
}

/// Pull new listings and try to open a position in each
///
/// Returns the per-candidate outcome; only the listing call itself fails the cycle.
pub async fn scan_cycle(ctx: &TraderContext, store: &mut PositionStore) -> BotResult<ScanSummary> {
    logger::info(LogTag::Discovery, "Scanning for new tokens...");
    let candidates = ctx
        .call("scan_new_tokens", ctx.services.tokens.scan_new_tokens())
        .await?;

    let mut summary = ScanSummary {
        candidates: candidates.len(),
        ..ScanSummary::default()
    };

    for asset_id in candidates {
        match acquire(ctx, store, &asset_id).await {
            Ok((position, size)) => {
                let (entry_price, amount) = (position.entry_price, position.amount);
                store.insert(position);
                if let Err(e) = store.save().await {
                    logger::error(
                        LogTag::Positions,
                        &format!("Failed to persist new position {}: {}", short_id(&asset_id), e),
                    );
                }
                dispatch(
                    &ctx.services.notifier,
                    Notification::position_opened(&asset_id, size, entry_price),
                );
                append_record(ctx, TradeRecord::buy(&asset_id, amount, entry_price, size)).await;
                summary.opened.push(asset_id);
            }
            Err(reason) => {
                logger::info(
                    LogTag::Discovery,
                    &format!("Rejected {}: {}", short_id(&asset_id), reason),
                );
                summary.rejected.push((asset_id, reason));
            }
        }
    }

    Ok(summary)
}

async fn acquire(
    ctx: &TraderContext,
    store: &PositionStore,
    asset_id: &str,
) -> Result<(Position, f64), Rejection> {
    let services = &ctx.services;

    if store.contains(asset_id) {
        return Err(Rejection::AlreadyHeld);
    }
    if store.len() >= ctx.settings.max_open_positions {
        return Err(Rejection::MaxPositions(ctx.settings.max_open_positions));
    }

    logger::info(LogTag::Discovery, &format!("Analyzing {}...", short_id(asset_id)));

    let report = ctx
        .call("risk_report", services.risk.report(asset_id))
        .await
        .map_err(|e| Rejection::RiskCheckFailed(e.to_string()))?
        .ok_or(Rejection::NoRiskReport)?;
    if !report.is_trusted(ctx.max_risk_score) {
        return Err(Rejection::RiskTooHigh(report.score));
    }
    logger::debug(
        LogTag::Security,
        &format!(
            "{} passed risk check (score {}, {} risks)",
            short_id(asset_id),
            report.score,
            report.risks.len()
        ),
    );

    let balance = ctx
        .call("sol_balance", services.executor.sol_balance())
        .await
        .map_err(|e| Rejection::BalanceUnavailable(e.to_string()))?;
    let size = ctx.money.position_size(balance);
    if !ctx.money.is_viable(size) {
        return Err(Rejection::BelowMinimum(size));
    }

    let base_mint = &ctx.settings.base_mint;
    let quote = ctx
        .call("buy_quote", services.quotes.quote(base_mint, asset_id, size))
        .await
        .map_err(|e| Rejection::QuoteFailed(e.to_string()))?;
    let entry_price = quote.price_in(base_mint).ok_or(Rejection::ZeroOutput)?;
    let amount = quote.out_amount_ui();

    logger::info(
        LogTag::Trader,
        &format!("Buying {} with {:.4} SOL", short_id(asset_id), size),
    );
    ctx.call("swap", services.executor.swap(&quote))
        .await
        .map_err(|e| Rejection::ExecutionFailed(e.to_string()))?;

    let position = Position::new(asset_id, entry_price, amount);
    logger::info(
        LogTag::Positions,
        &format!(
            "Opened {}: {:.6} tokens @ {:.10} SOL",
            short_id(asset_id),
            amount,
            entry_price
        ),
    );

    Ok((position, size))
}
