//! Trading orchestration
//!
//! A single worker owns the position store and runs scan-then-manage cycles.
//! Everything outside the worker talks to it through `ControlHandle`.

mod acquisition;
mod control;
mod manager;
mod scheduler;

#[cfg(test)]
mod tests;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, TraderConfig};
use crate::discovery::TokenSource;
use crate::errors::{BotError, BotResult};
use crate::money::MoneyManager;
use crate::notifications::Notifier;
use crate::rugcheck::RiskOracle;
use crate::strategy::ExitPolicy;
use crate::swaps::{Executor, QuoteProvider};
use crate::trade_log::TradeLog;

pub use acquisition::{scan_cycle, Rejection, ScanSummary};
pub use control::{control_channel, ControlHandle, ControlReceiver, TraderCommand, TraderStatus};
pub use manager::{manage_cycle, ManageSummary};
pub use scheduler::Scheduler;

/// External services the trader depends on
#[derive(Clone)]
pub struct Collaborators {
    pub quotes: Arc<dyn QuoteProvider>,
    pub executor: Arc<dyn Executor>,
    pub risk: Arc<dyn RiskOracle>,
    pub tokens: Arc<dyn TokenSource>,
    pub notifier: Arc<dyn Notifier>,
    pub trade_log: Arc<dyn TradeLog>,
}

/// Collaborators plus the policy and limits every cycle runs with
pub struct TraderContext {
    pub services: Collaborators,
    pub policy: ExitPolicy,
    pub money: MoneyManager,
    pub settings: TraderConfig,
    pub max_risk_score: f64,
}

impl TraderContext {
    pub fn new(config: &Config, services: Collaborators) -> Self {
        Self {
            services,
            policy: ExitPolicy::new(config.strategy.clone()),
            money: MoneyManager::new(config.money.clone()),
            settings: config.trader.clone(),
            max_risk_score: config.rugcheck.max_risk_score,
        }
    }

    /// Run a collaborator call under the configured timeout
    pub(crate) async fn call<T, F>(&self, operation: &str, fut: F) -> BotResult<T>
    where
        F: Future<Output = BotResult<T>>,
    {
        let secs = self.settings.call_timeout_secs;
        match tokio::time::timeout(Duration::from_secs(secs), fut).await {
            Ok(result) => result,
            Err(_) => Err(BotError::timeout(operation, secs)),
        }
    }
}
