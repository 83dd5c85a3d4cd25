//! Management cycle: price, high-water mark, exit policy, sell, tax

use chrono::NaiveDate;

use super::TraderContext;
use crate::errors::BotResult;
use crate::logger::{self, log_price_change, short_id, LogTag};
use crate::notifications::{dispatch, Notification};
use crate::positions::{Position, PositionStore};
use crate::trade_log::TradeRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManageSummary {
    pub evaluated: usize,
    pub skipped: usize,
    pub sells: usize,
    pub closed: usize,
}

/// What one evaluation did to a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Unchanged,
    Updated,
    Sold,
    Closed,
    Skipped,
}

/// Evaluate every open position once and persist if anything changed
pub async fn manage_cycle(
    ctx: &TraderContext,
    store: &mut PositionStore,
    today: NaiveDate,
) -> BotResult<ManageSummary> {
    let mut summary = ManageSummary::default();
    let mut mutated = false;

    if !store.is_empty() {
        logger::info(
            LogTag::Trader,
            &format!("Managing {} positions", store.len()),
        );
    }

    for asset_id in store.asset_ids() {
        let Some(position) = store.get_mut(&asset_id) else {
            continue;
        };
        summary.evaluated += 1;

        match manage_position(ctx, position, today).await {
            Outcome::Unchanged => {}
            Outcome::Skipped => summary.skipped += 1,
            Outcome::Updated => mutated = true,
            Outcome::Sold => {
                summary.sells += 1;
                mutated = true;
            }
            Outcome::Closed => {
                summary.sells += 1;
                summary.closed += 1;
                mutated = true;
                store.remove(&asset_id);
                logger::info(
                    LogTag::Positions,
                    &format!("Position {} closed", short_id(&asset_id)),
                );
                reclaim_account(ctx, &asset_id).await;
            }
        }
    }

    if mutated {
        store.save().await?;
    }

    Ok(summary)
}

async fn manage_position(ctx: &TraderContext, position: &mut Position, today: NaiveDate) -> Outcome {
    let services = &ctx.services;
    let id = short_id(&position.asset_id);

    if position.entry_price <= 0.0 {
        logger::warning(
            LogTag::Positions,
            &format!(
                "Skipping {}: invalid entry price {}",
                id, position.entry_price
            ),
        );
        return Outcome::Skipped;
    }

    let price = match ctx
        .call("current_price", services.quotes.current_price(&position.asset_id))
        .await
    {
        Ok(price) if price.is_finite() && price > 0.0 => price,
        Ok(price) => {
            logger::warning(
                LogTag::Positions,
                &format!("Skipping {}: unusable price {}", id, price),
            );
            return Outcome::Skipped;
        }
        Err(e) => {
            logger::warning(
                LogTag::Positions,
                &format!("Skipping {}: price fetch failed: {}", id, e),
            );
            return Outcome::Skipped;
        }
    };

    let previous_high = position.highest_price;
    let high_moved = position.observe_price(price);
    log_price_change(&position.asset_id, previous_high, price, position.entry_price);

    let decision = ctx.policy.decide(&position.exit_context(price, today));
    let held = if high_moved {
        Outcome::Updated
    } else {
        Outcome::Unchanged
    };

    if !decision.should_sell {
        logger::debug(
            LogTag::Strategy,
            &format!("{} hold: {}", id, decision.reason),
        );
        return held;
    }

    let sell_amount = position.amount * decision.sell_fraction;
    logger::info(
        LogTag::Trader,
        &format!(
            "Selling {:.6} of {} ({:.0}%): {}",
            sell_amount,
            id,
            decision.sell_fraction * 100.0,
            decision.reason
        ),
    );

    let quote = match ctx
        .call(
            "sell_quote",
            services
                .quotes
                .quote(&position.asset_id, &ctx.settings.base_mint, sell_amount),
        )
        .await
    {
        Ok(quote) => quote,
        Err(e) => {
            logger::warning(
                LogTag::Swap,
                &format!("Sell quote for {} failed, retrying next cycle: {}", id, e),
            );
            return held;
        }
    };

    let proceeds = match ctx.call("swap", services.executor.swap(&quote)).await {
        Ok(received) => received,
        Err(e) => {
            logger::error(
                LogTag::Swap,
                &format!("Sell of {} failed, position unchanged: {}", id, e),
            );
            return held;
        }
    };

    let realized_pnl = (price - position.entry_price) * sell_amount;
    let tax = ctx.money.tax(realized_pnl);
    if tax > 0.0 {
        route_tax(ctx, &position.asset_id, tax).await;
    }

    let remaining = position.apply_sell(sell_amount, decision.reason.tier());
    let closed = decision.is_full_exit() || ctx.money.is_dust(remaining);

    dispatch(
        &services.notifier,
        Notification::position_sold(
            &position.asset_id,
            proceeds,
            price,
            decision.reason.as_str(),
            position.unrealized_pnl_pct(price),
            closed,
        ),
    );
    append_record(
        ctx,
        TradeRecord::sell(
            &position.asset_id,
            sell_amount,
            price,
            proceeds,
            realized_pnl,
            decision.reason.as_str(),
        ),
    )
    .await;

    if closed {
        Outcome::Closed
    } else {
        Outcome::Sold
    }
}

/// Send the profit tax; a failure is a reconciliation item, the sell stands
async fn route_tax(ctx: &TraderContext, asset_id: &str, tax: f64) {
    let treasury = ctx.settings.treasury_address.trim();
    if treasury.is_empty() {
        logger::error(
            LogTag::Treasury,
            &format!(
                "RECONCILE: {:.9} SOL tax on {} owed, no treasury address configured",
                tax, asset_id
            ),
        );
        return;
    }

    match ctx
        .call("treasury_transfer", ctx.services.executor.transfer(treasury, tax))
        .await
    {
        Ok(()) => {
            logger::info(
                LogTag::Treasury,
                &format!("Sent {:.9} SOL tax to treasury", tax),
            );
            dispatch(&ctx.services.notifier, Notification::tax_deposit(tax));
            append_record(ctx, TradeRecord::tax(tax)).await;
        }
        Err(e) => logger::error(
            LogTag::Treasury,
            &format!(
                "RECONCILE: {:.9} SOL tax on {} not transferred to {}: {}",
                tax, asset_id, treasury, e
            ),
        ),
    }
}

/// Close the emptied token account once the position is gone
async fn reclaim_account(ctx: &TraderContext, asset_id: &str) {
    let executor = &ctx.services.executor;
    let balance = match ctx.call("token_balance", executor.token_balance(asset_id)).await {
        Ok(balance) => balance,
        Err(e) => {
            logger::warning(
                LogTag::Wallet,
                &format!("Token balance check for {} failed: {}", short_id(asset_id), e),
            );
            return;
        }
    };

    if !ctx.money.should_reclaim(balance) {
        logger::debug(
            LogTag::Wallet,
            &format!(
                "Keeping token account for {} ({} left)",
                short_id(asset_id),
                balance
            ),
        );
        return;
    }

    match ctx
        .call("close_token_account", executor.close_token_account(asset_id))
        .await
    {
        Ok(()) => logger::info(
            LogTag::Wallet,
            &format!("Closed token account for {}", short_id(asset_id)),
        ),
        Err(e) => logger::warning(
            LogTag::Wallet,
            &format!("Closing token account for {} failed: {}", short_id(asset_id), e),
        ),
    }
}

/// Append to the trade log on the blocking pool; failures never fail a trade
pub(super) async fn append_record(ctx: &TraderContext, record: TradeRecord) {
    let trade_log = ctx.services.trade_log.clone();
    let trade_type = record.trade_type;
    let result = tokio::task::spawn_blocking(move || trade_log.append(&record)).await;

    let err = match result {
        Ok(Ok(())) => return,
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    };
    logger::warning(
        LogTag::Trader,
        &format!("Failed to record {} trade: {}", trade_type, err),
    );
}
