//! Orchestrator scenarios against in-memory collaborators

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::config::{Config, SOL_MINT};
use crate::errors::{BotError, BotResult};
use crate::notifications::{Notification, NotificationType};
use crate::positions::{Position, PositionStore};
use crate::rugcheck::RiskReport;
use crate::strategy::TierFlags;
use crate::swaps::{to_raw_amount, PaperExecutor, Quote};
use crate::trade_log::{TradeRecord, TradeType};

const TOKEN_DECIMALS: u8 = 6;
const SOL_DECIMALS: u8 = 9;
const TREASURY: &str = "treasury";

// ============================================================================
// MOCK COLLABORATORS
// ============================================================================

#[derive(Default)]
struct MockQuotes {
    prices: Mutex<HashMap<String, f64>>,
    failing: Mutex<HashSet<String>>,
    zero_output: HashSet<String>,
}

impl MockQuotes {
    fn set_price(&self, asset: &str, price: f64) {
        self.prices.lock().unwrap().insert(asset.to_string(), price);
    }

    fn fail(&self, asset: &str) {
        self.failing.lock().unwrap().insert(asset.to_string());
    }

    fn price(&self, asset: &str) -> BotResult<f64> {
        if self.failing.lock().unwrap().contains(asset) {
            return Err(BotError::Network(format!("price feed down for {}", asset)));
        }
        self.prices
            .lock()
            .unwrap()
            .get(asset)
            .copied()
            .ok_or_else(|| BotError::api("mock", format!("no price for {}", asset)))
    }
}

#[async_trait]
impl QuoteProvider for MockQuotes {
    async fn quote(&self, input_mint: &str, output_mint: &str, amount: f64) -> BotResult<Quote> {
        let (in_decimals, out_decimals, out_ui) = if input_mint == SOL_MINT {
            let price = self.price(output_mint)?;
            let out = if self.zero_output.contains(output_mint) {
                0.0
            } else {
                amount / price
            };
            (SOL_DECIMALS, TOKEN_DECIMALS, out)
        } else {
            (TOKEN_DECIMALS, SOL_DECIMALS, amount * self.price(input_mint)?)
        };
        Ok(Quote {
            input_mint: input_mint.to_string(),
            output_mint: output_mint.to_string(),
            in_amount: to_raw_amount(amount, in_decimals),
            out_amount: to_raw_amount(out_ui, out_decimals),
            in_decimals,
            out_decimals,
            price_impact_pct: 0.0,
            slippage_bps: 50,
        })
    }

    async fn current_price(&self, asset_id: &str) -> BotResult<f64> {
        self.price(asset_id)
    }
}

/// Paper wallet with switchable failures
struct MockExecutor {
    inner: PaperExecutor,
    fail_swaps: AtomicBool,
    fail_transfers: AtomicBool,
    closed: Mutex<Vec<String>>,
}

impl MockExecutor {
    fn new(sol: f64) -> Self {
        Self {
            inner: PaperExecutor::new(sol),
            fail_swaps: AtomicBool::new(false),
            fail_transfers: AtomicBool::new(false),
            closed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn swap(&self, quote: &Quote) -> BotResult<f64> {
        if self.fail_swaps.load(Ordering::SeqCst) {
            return Err(BotError::Execution("swap rejected".to_string()));
        }
        self.inner.swap(quote).await
    }

    async fn transfer(&self, to: &str, amount_sol: f64) -> BotResult<()> {
        if self.fail_transfers.load(Ordering::SeqCst) {
            return Err(BotError::Network("rpc unavailable".to_string()));
        }
        self.inner.transfer(to, amount_sol).await
    }

    async fn sol_balance(&self) -> BotResult<f64> {
        self.inner.sol_balance().await
    }

    async fn token_balance(&self, asset_id: &str) -> BotResult<f64> {
        self.inner.token_balance(asset_id).await
    }

    async fn close_token_account(&self, asset_id: &str) -> BotResult<()> {
        self.inner.close_token_account(asset_id).await?;
        self.closed.lock().unwrap().push(asset_id.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct MockRisk {
    scores: HashMap<String, Option<f64>>,
}

#[async_trait]
impl RiskOracle for MockRisk {
    async fn report(&self, asset_id: &str) -> BotResult<Option<RiskReport>> {
        Ok(self
            .scores
            .get(asset_id)
            .copied()
            .flatten()
            .map(|score| RiskReport {
                score,
                risks: Vec::new(),
            }))
    }
}

#[derive(Default)]
struct MockTokens {
    batches: Mutex<VecDeque<Vec<String>>>,
}

#[async_trait]
impl TokenSource for MockTokens {
    async fn scan_new_tokens(&self) -> BotResult<Vec<String>> {
        Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> BotResult<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

#[derive(Default)]
struct MemoryTradeLog {
    records: Mutex<Vec<TradeRecord>>,
    threads: Mutex<Vec<std::thread::ThreadId>>,
}

impl TradeLog for MemoryTradeLog {
    fn append(&self, record: &TradeRecord) -> BotResult<()> {
        self.threads.lock().unwrap().push(std::thread::current().id());
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

// ============================================================================
// HARNESS
// ============================================================================

struct Harness {
    ctx: TraderContext,
    quotes: Arc<MockQuotes>,
    executor: Arc<MockExecutor>,
    tokens: Arc<MockTokens>,
    trade_log: Arc<MemoryTradeLog>,
    store: PositionStore,
    _dir: tempfile::TempDir,
}

impl Harness {
    fn new(quotes: MockQuotes, risk: MockRisk, sol: f64, config: Config) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let quotes = Arc::new(quotes);
        let executor = Arc::new(MockExecutor::new(sol));
        let tokens = Arc::new(MockTokens::default());
        let trade_log = Arc::new(MemoryTradeLog::default());
        let services = Collaborators {
            quotes: quotes.clone(),
            executor: executor.clone(),
            risk: Arc::new(risk),
            tokens: tokens.clone(),
            notifier: Arc::new(RecordingNotifier::default()),
            trade_log: trade_log.clone(),
        };
        Self {
            ctx: TraderContext::new(&config, services),
            quotes,
            executor,
            tokens,
            trade_log,
            store: PositionStore::new(dir.path().join("positions.json")),
            _dir: dir,
        }
    }

    fn simple(sol: f64) -> Self {
        Self::new(MockQuotes::default(), MockRisk::default(), sol, test_config())
    }

    /// Put `amount` tokens in the paper wallet and open a position for them
    async fn hold(&mut self, asset: &str, entry_price: f64, amount: f64) {
        self.quotes.set_price(asset, entry_price);
        let quote = self
            .quotes
            .quote(SOL_MINT, asset, amount * entry_price)
            .await
            .unwrap();
        self.executor.inner.swap(&quote).await.unwrap();
        self.store.insert(Position::new(asset, entry_price, amount));
    }

    async fn manage(&mut self) -> ManageSummary {
        manage_cycle(&self.ctx, &mut self.store, summer_day()).await.unwrap()
    }

    fn records(&self, kind: TradeType) -> Vec<TradeRecord> {
        self.trade_log
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.trade_type == kind)
            .cloned()
            .collect()
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.trader.treasury_address = TREASURY.to_string();
    config
}

fn summer_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
}

// ============================================================================
// MANAGEMENT CYCLE
// ============================================================================

#[tokio::test]
async fn test_price_failure_skips_only_that_position() {
    let mut h = Harness::simple(1000.0);
    h.hold("alpha", 1.0, 100.0).await;
    h.hold("beta", 1.0, 100.0).await;
    h.quotes.fail("alpha");
    h.quotes.set_price("beta", 1.3);

    let summary = h.manage().await;
    assert_eq!(summary.evaluated, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.sells, 1);

    let alpha = h.store.get("alpha").unwrap();
    assert_eq!(alpha.amount, 100.0);
    assert!(!alpha.tier_flags.tier1_sold);

    let beta = h.store.get("beta").unwrap();
    assert_close(beta.amount, 80.0);
    assert!(beta.tier_flags.tier1_sold);
    assert_eq!(beta.highest_price, 1.3);
}

#[tokio::test]
async fn test_treasury_failure_keeps_the_sell() {
    let mut h = Harness::simple(1000.0);
    h.hold("alpha", 1.0, 100.0).await;
    h.quotes.set_price("alpha", 1.3);
    h.executor.fail_transfers.store(true, Ordering::SeqCst);

    h.manage().await;

    let alpha = h.store.get("alpha").unwrap();
    assert_close(alpha.amount, 80.0);
    assert!(alpha.tier_flags.tier1_sold);
    assert_eq!(h.records(TradeType::Sell).len(), 1);
    assert!(h.records(TradeType::Tax).is_empty());
    assert!(h.executor.inner.transfers().await.is_empty());
}

#[tokio::test]
async fn test_trade_log_writes_run_off_the_worker_thread() {
    let mut h = Harness::simple(1000.0);
    h.hold("alpha", 1.0, 100.0).await;
    h.quotes.set_price("alpha", 1.3);

    h.manage().await;

    assert_eq!(h.records(TradeType::Sell).len(), 1);
    assert_eq!(h.records(TradeType::Tax).len(), 1);
    let worker = std::thread::current().id();
    let threads = h.trade_log.threads.lock().unwrap();
    assert_eq!(threads.len(), 2);
    assert!(threads.iter().all(|id| *id != worker));
}

#[tokio::test]
async fn test_missing_treasury_keeps_the_sell() {
    let mut config = test_config();
    config.trader.treasury_address.clear();
    let mut h = Harness::new(MockQuotes::default(), MockRisk::default(), 1000.0, config);
    h.hold("alpha", 1.0, 100.0).await;
    h.quotes.set_price("alpha", 1.3);

    h.manage().await;

    assert!(h.store.get("alpha").unwrap().tier_flags.tier1_sold);
    assert!(h.records(TradeType::Tax).is_empty());
}

#[tokio::test]
async fn test_failed_swap_changes_nothing_but_high_water() {
    let mut h = Harness::simple(1000.0);
    h.hold("alpha", 1.0, 100.0).await;
    h.quotes.set_price("alpha", 1.3);
    h.executor.fail_swaps.store(true, Ordering::SeqCst);

    h.manage().await;

    let alpha = h.store.get("alpha").unwrap();
    assert_eq!(alpha.amount, 100.0);
    assert!(!alpha.tier_flags.tier1_sold);
    assert_eq!(alpha.highest_price, 1.3);
    assert!(h.trade_log.records.lock().unwrap().is_empty());
    // High-water change alone is persisted
    assert!(h.store.path().exists());
}

#[tokio::test]
async fn test_tier_walk_to_moonbag_exit() {
    let mut h = Harness::simple(1000.0);
    h.hold("alpha", 1.0, 100.0).await;

    let expected = [(1.3, 80.0), (1.6, 56.0), (2.1, 42.0), (2.5, 42.0)];
    for (price, amount) in expected {
        h.quotes.set_price("alpha", price);
        h.manage().await;
        assert_close(h.store.get("alpha").unwrap().amount, amount);
    }

    let flags = h.store.get("alpha").unwrap().tier_flags;
    assert!(flags.tier1_sold && flags.tier2_sold && flags.tier3_sold);
    assert_eq!(h.store.get("alpha").unwrap().highest_price, 2.5);

    // 16% below the 2.5 high
    h.quotes.set_price("alpha", 2.1);
    let summary = h.manage().await;
    assert_eq!(summary.closed, 1);
    assert!(h.store.get("alpha").is_none());

    let sells = h.records(TradeType::Sell);
    let reasons: Vec<&str> = sells.iter().map(|r| r.reason.as_str()).collect();
    assert_eq!(
        reasons,
        vec!["Tier 1 Profit", "Tier 2 Profit", "Tier 3 Profit", "Moonbag Trailing Stop"]
    );
    assert_close(sells[0].pnl_sol, 6.0);

    let taxes = h.records(TradeType::Tax);
    assert_eq!(taxes.len(), 4);
    assert_close(taxes[0].amount, 1.2);
    assert_eq!(h.executor.inner.transfers().await.len(), 4);

    // Emptied account reclaimed
    assert_eq!(*h.executor.closed.lock().unwrap(), vec!["alpha".to_string()]);

    let reloaded = PositionStore::load(h.store.path()).await.unwrap();
    assert!(reloaded.is_empty());
}

#[tokio::test]
async fn test_dust_remainder_closes_position() {
    let mut h = Harness::simple(1000.0);
    h.hold("alpha", 1.0, 0.0001).await;
    h.quotes.set_price("alpha", 1.3);

    let summary = h.manage().await;
    assert_eq!(summary.closed, 1);
    assert!(h.store.is_empty());
    // Dust is still in the wallet, so the account stays open
    assert!(h.executor.closed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_losing_sell_pays_no_tax() {
    let mut h = Harness::simple(1000.0);
    h.hold("alpha", 1.0, 100.0).await;
    {
        let p = h.store.get_mut("alpha").unwrap();
        p.tier_flags.tier1_sold = true;
        p.tier_flags.tier2_sold = true;
        p.tier_flags.tier3_sold = true;
        p.highest_price = 3.0;
    }
    h.quotes.set_price("alpha", 0.9);

    h.manage().await;

    assert!(h.store.is_empty());
    let sells = h.records(TradeType::Sell);
    assert_eq!(sells.len(), 1);
    assert!(sells[0].pnl_sol < 0.0);
    assert!(h.records(TradeType::Tax).is_empty());
}

#[tokio::test]
async fn test_invalid_entry_price_is_skipped() {
    let mut h = Harness::simple(1000.0);
    h.quotes.set_price("alpha", 5.0);
    h.store.insert(Position::new("alpha", 0.0, 10.0));

    let summary = h.manage().await;
    assert_eq!(summary.skipped, 1);
    assert_eq!(h.store.get("alpha").unwrap().amount, 10.0);
}

// ============================================================================
// SCAN CYCLE
// ============================================================================

#[tokio::test]
async fn test_scan_screens_and_buys() {
    let quotes = MockQuotes {
        zero_output: ["empty".to_string()].into_iter().collect(),
        ..MockQuotes::default()
    };
    quotes.set_price("good", 0.001);
    quotes.set_price("empty", 0.001);

    let risk = MockRisk {
        scores: [
            ("held".to_string(), Some(0.0)),
            ("risky".to_string(), Some(150.0)),
            ("unknown".to_string(), None),
            ("good".to_string(), Some(100.0)),
            ("empty".to_string(), Some(10.0)),
        ]
        .into_iter()
        .collect(),
    };

    let mut h = Harness::new(quotes, risk, 10.0, test_config());
    h.store.insert(Position::new("held", 1.0, 1.0));
    h.tokens.batches.lock().unwrap().push_back(
        ["held", "risky", "unknown", "good", "empty"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );

    let summary = scan_cycle(&h.ctx, &mut h.store).await.unwrap();
    assert_eq!(summary.candidates, 5);
    assert_eq!(summary.opened, vec!["good".to_string()]);

    let rejected: HashMap<String, Rejection> = summary.rejected.into_iter().collect();
    assert_eq!(rejected["held"], Rejection::AlreadyHeld);
    assert_eq!(rejected["risky"], Rejection::RiskTooHigh(150.0));
    assert_eq!(rejected["unknown"], Rejection::NoRiskReport);
    assert_eq!(rejected["empty"], Rejection::ZeroOutput);

    let good = h.store.get("good").unwrap();
    assert_close(good.entry_price, 0.001);
    assert_eq!(good.highest_price, good.entry_price);
    assert_close(good.amount, 1000.0);
    assert_eq!(good.tier_flags, TierFlags::default());

    assert_eq!(h.records(TradeType::Buy).len(), 1);
    assert_close(h.executor.sol_balance().await.unwrap(), 9.0);

    let reloaded = PositionStore::load(h.store.path()).await.unwrap();
    assert!(reloaded.contains("good"));
}

#[tokio::test]
async fn test_scan_respects_balance_and_position_limit() {
    let risk = MockRisk {
        scores: [("a".to_string(), Some(0.0)), ("b".to_string(), Some(0.0))]
            .into_iter()
            .collect(),
    };
    let mut config = test_config();
    config.trader.max_open_positions = 1;

    let mut h = Harness::new(MockQuotes::default(), risk, 0.05, config);
    h.quotes.set_price("a", 0.001);
    h.quotes.set_price("b", 0.001);
    h.tokens
        .batches
        .lock()
        .unwrap()
        .push_back(vec!["a".to_string()]);

    let summary = scan_cycle(&h.ctx, &mut h.store).await.unwrap();
    assert!(matches!(summary.rejected[0].1, Rejection::BelowMinimum(_)));

    h.store.insert(Position::new("x", 1.0, 1.0));
    h.tokens
        .batches
        .lock()
        .unwrap()
        .push_back(vec!["b".to_string()]);
    let summary = scan_cycle(&h.ctx, &mut h.store).await.unwrap();
    assert_eq!(summary.rejected[0].1, Rejection::MaxPositions(1));
}

// ============================================================================
// SCHEDULER
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_scheduler_pause_resume_shutdown() {
    let mut h = Harness::simple(1000.0);
    h.hold("alpha", 1.0, 100.0).await;

    let Harness { ctx, store, quotes, _dir, .. } = h;
    let (handle, control) = control_channel(TraderStatus::default());
    let worker = tokio::spawn(Scheduler::new(ctx, store, control, true).run());
    let mut status = handle.subscribe();

    // Starts paused: time passes, no cycles run
    status.wait_for(|s| s.running && s.paused).await.unwrap();
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(handle.status().cycles, 0);

    quotes.set_price("alpha", 1.3);
    handle.resume().await.unwrap();
    status.wait_for(|s| s.cycles >= 1).await.unwrap();
    let snapshot = handle.status();
    assert!(!snapshot.paused);
    assert!(snapshot.open_positions[0].tier_flags.tier1_sold);

    handle.pause().await.unwrap();
    status.wait_for(|s| s.paused).await.unwrap();
    let cycles = handle.status().cycles;
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(handle.status().cycles, cycles);

    handle.send(TraderCommand::Shutdown).await.unwrap();
    let store = worker.await.unwrap();
    assert!(!handle.status().running);
    assert_close(store.get("alpha").unwrap().amount, 80.0);

    let reloaded = PositionStore::load(store.path()).await.unwrap();
    assert!(reloaded.get("alpha").unwrap().tier_flags.tier1_sold);
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_survives_cycle_errors() {
    struct BrokenTokens;

    #[async_trait]
    impl TokenSource for BrokenTokens {
        async fn scan_new_tokens(&self) -> BotResult<Vec<String>> {
            Err(BotError::Network("listing unavailable".to_string()))
        }
    }

    let mut h = Harness::simple(1000.0);
    h.ctx.services.tokens = Arc::new(BrokenTokens);
    let Harness { ctx, store, _dir, .. } = h;

    let (handle, control) = control_channel(TraderStatus::default());
    let worker = tokio::spawn(Scheduler::new(ctx, store, control, false).run());
    let mut status = handle.subscribe();

    status.wait_for(|s| s.cycles >= 2).await.unwrap();
    assert!(handle.status().last_error.unwrap().contains("listing unavailable"));

    assert!(handle.request_shutdown());
    worker.await.unwrap();
}

#[tokio::test]
async fn test_notifications_follow_trades() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut h = Harness::simple(1000.0);
    h.ctx.services.notifier = notifier.clone();
    h.hold("alpha", 1.0, 100.0).await;
    h.quotes.set_price("alpha", 1.3);

    h.manage().await;
    for _ in 0..100 {
        if notifier.sent.lock().unwrap().len() >= 2 {
            break;
        }
        tokio::task::yield_now().await;
    }

    let sent = notifier.sent.lock().unwrap();
    assert!(sent
        .iter()
        .any(|n| matches!(n.notification_type, NotificationType::TaxDeposit { .. })));
    assert!(sent.iter().any(|n| matches!(
        &n.notification_type,
        NotificationType::PositionSold { reason, closed: false, .. } if reason == "Tier 1 Profit"
    )));
}
