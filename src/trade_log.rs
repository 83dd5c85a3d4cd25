/// Append-only trade ledger
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::errors::{BotError, BotResult};

pub const CSV_HEADERS: [&str; 10] = [
    "Timestamp",
    "Date",
    "Type",
    "Token",
    "Amount",
    "Price",
    "Total_SOL",
    "Fee_SOL",
    "PnL_SOL",
    "Reason",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeType {
    Buy,
    Sell,
    Tax,
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TradeType::Buy => "BUY",
            TradeType::Sell => "SELL",
            TradeType::Tax => "TAX",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub trade_type: TradeType,
    /// Token mint, or "SOL" for tax deposits
    pub asset: String,
    pub amount: f64,
    pub price: f64,
    pub total_sol: f64,
    pub fee_sol: f64,
    pub pnl_sol: f64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl TradeRecord {
    pub fn buy(asset: &str, amount: f64, price: f64, total_sol: f64) -> Self {
        Self {
            trade_type: TradeType::Buy,
            asset: asset.to_string(),
            amount,
            price,
            total_sol,
            fee_sol: 0.0,
            pnl_sol: 0.0,
            reason: "Initial Entry".to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn sell(asset: &str, amount: f64, price: f64, total_sol: f64, pnl_sol: f64, reason: &str) -> Self {
        Self {
            trade_type: TradeType::Sell,
            asset: asset.to_string(),
            amount,
            price,
            total_sol,
            fee_sol: 0.0,
            pnl_sol,
            reason: reason.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn tax(amount_sol: f64) -> Self {
        Self {
            trade_type: TradeType::Tax,
            asset: "SOL".to_string(),
            amount: amount_sol,
            price: 0.0,
            total_sol: amount_sol,
            fee_sol: 0.0,
            pnl_sol: 0.0,
            reason: "Tax Vault Deposit".to_string(),
            timestamp: Utc::now(),
        }
    }

    fn to_row(&self) -> [String; 10] {
        [
            self.timestamp.to_rfc3339(),
            self.timestamp.format("%Y-%m-%d").to_string(),
            self.trade_type.to_string(),
            self.asset.clone(),
            self.amount.to_string(),
            self.price.to_string(),
            self.total_sol.to_string(),
            self.fee_sol.to_string(),
            self.pnl_sol.to_string(),
            self.reason.clone(),
        ]
    }
}

pub trait TradeLog: Send + Sync {
    fn append(&self, record: &TradeRecord) -> BotResult<()>;
}

/// CSV ledger; the header row is written when the file is created
pub struct CsvTradeLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvTradeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

impl TradeLog for CsvTradeLog {
    fn append(&self, record: &TradeRecord) -> BotResult<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| BotError::Store("trade log lock poisoned".to_string()))?;

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(CSV_HEADERS)?;
        }
        writer.write_record(record.to_row())?;
        writer.flush()?;
        Ok(())
    }
}
