//! Notification payloads and their message rendering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NotificationType {
    /// A new position was bought
    PositionOpened {
        asset_id: String,
        amount_sol: f64,
        entry_price: f64,
    },

    /// Part or all of a position was sold
    PositionSold {
        asset_id: String,
        value_sol: f64,
        price: f64,
        reason: String,
        pnl_percent: f64,
        closed: bool,
    },

    /// Profit tax sent to the treasury
    TaxDeposit { amount_sol: f64 },

    BotStarted { version: String, mode: String },

    BotStopped { reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_type: NotificationType,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(notification_type: NotificationType) -> Self {
        Self {
            notification_type,
            timestamp: Utc::now(),
        }
    }

    pub fn position_opened(asset_id: &str, amount_sol: f64, entry_price: f64) -> Self {
        Self::new(NotificationType::PositionOpened {
            asset_id: asset_id.to_string(),
            amount_sol,
            entry_price,
        })
    }

    pub fn position_sold(
        asset_id: &str,
        value_sol: f64,
        price: f64,
        reason: &str,
        pnl_percent: f64,
        closed: bool,
    ) -> Self {
        Self::new(NotificationType::PositionSold {
            asset_id: asset_id.to_string(),
            value_sol,
            price,
            reason: reason.to_string(),
            pnl_percent,
            closed,
        })
    }

    pub fn tax_deposit(amount_sol: f64) -> Self {
        Self::new(NotificationType::TaxDeposit { amount_sol })
    }

    /// Single-line summary for logs
    pub fn summary(&self) -> String {
        match &self.notification_type {
            NotificationType::PositionOpened {
                asset_id,
                amount_sol,
                entry_price,
            } => format!(
                "BUY {} for {:.4} SOL @ {:.10}",
                asset_id, amount_sol, entry_price
            ),
            NotificationType::PositionSold {
                asset_id,
                value_sol,
                reason,
                pnl_percent,
                closed,
                ..
            } => format!(
                "{} {} for {:.4} SOL ({}, {:+.2}%)",
                if *closed { "CLOSE" } else { "SELL" },
                asset_id,
                value_sol,
                reason,
                pnl_percent
            ),
            NotificationType::TaxDeposit { amount_sol } => {
                format!("TAX {:.6} SOL to treasury", amount_sol)
            }
            NotificationType::BotStarted { version, mode } => {
                format!("Bot started v{} ({})", version, mode)
            }
            NotificationType::BotStopped { reason } => format!("Bot stopped: {}", reason),
        }
    }

    /// Telegram HTML message body
    pub fn to_html(&self) -> String {
        match &self.notification_type {
            NotificationType::PositionOpened {
                asset_id,
                amount_sol,
                entry_price,
            } => format!(
                "🟢 <b>BUY</b>\n\nToken: <code>{}</code>\nSize: {:.4} SOL\nPrice: {:.10} SOL",
                asset_id, amount_sol, entry_price
            ),
            NotificationType::PositionSold {
                asset_id,
                value_sol,
                price,
                reason,
                pnl_percent,
                closed,
            } => {
                let emoji = if *pnl_percent >= 0.0 { "💰" } else { "🔴" };
                format!(
                    "{} <b>{}</b>\n\nToken: <code>{}</code>\nValue: {:.4} SOL\nPrice: {:.10} SOL\nReason: {}\nPnL: {:+.2}%",
                    emoji,
                    if *closed { "CLOSED" } else { "SELL" },
                    asset_id,
                    value_sol,
                    price,
                    reason,
                    pnl_percent
                )
            }
            NotificationType::TaxDeposit { amount_sol } => format!(
                "🏦 <b>TAX DEPOSIT</b>\n\n{:.6} SOL sent to treasury",
                amount_sol
            ),
            NotificationType::BotStarted { version, mode } => {
                format!("🚀 <b>skrybot v{}</b> started ({})", version, mode)
            }
            NotificationType::BotStopped { reason } => {
                format!("🛑 <b>skrybot stopped</b>\n\n{}", reason)
            }
        }
    }
}
