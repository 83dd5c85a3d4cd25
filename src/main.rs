use std::sync::Arc;

use anyhow::{Context, Result};
use skrybot::{
    arguments::{self, print_help},
    config::{self, Config},
    logger::{self, LogTag},
    notifications::{dispatch, LogNotifier, Notification, NotificationType, Notifier},
    paths,
    positions::PositionStore,
    rugcheck::RugcheckClient,
    swaps::{JupiterClient, PaperExecutor},
    trade_log::CsvTradeLog,
    trader::{control_channel, Collaborators, Scheduler, TraderContext, TraderStatus},
    VERSION,
};

/// Main entry point for skrybot
///
/// Startup order: directories, logger, config (+ .env overrides), collaborators,
/// position store, then the trading worker. Ctrl-C asks the worker to stop
/// after its current cycle.
#[tokio::main]
async fn main() {
    if arguments::is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    // Logger needs the logs directory to exist
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("❌ Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    logger::init();
    logger::info(LogTag::System, &format!("🚀 skrybot v{} starting up...", VERSION));

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            logger::error(LogTag::System, &format!("❌ Fatal: {:#}", e));
            1
        }
    };

    logger::flush();
    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let config = load_config()?;

    let jupiter = Arc::new(
        JupiterClient::new(config.jupiter.clone(), config.trader.slippage_bps)
            .context("creating Jupiter client")?,
    );
    let services = Collaborators {
        quotes: jupiter.clone(),
        executor: Arc::new(PaperExecutor::new(config.paper.starting_balance_sol)),
        risk: Arc::new(RugcheckClient::new(&config.rugcheck).context("creating Rugcheck client")?),
        tokens: jupiter,
        notifier: build_notifier(&config),
        trade_log: Arc::new(CsvTradeLog::new(paths::get_trades_log_path())),
    };
    let notifier = services.notifier.clone();

    let store = PositionStore::load(paths::get_positions_path())
        .await
        .context("loading positions")?;

    let paused = arguments::is_start_paused_enabled() || !config.trader.enabled;
    let (control, receiver) = control_channel(TraderStatus::default());

    let signal_handle = control.clone();
    ctrlc::set_handler(move || {
        logger::info(LogTag::System, "Ctrl-C received, stopping after the current cycle");
        if !signal_handle.request_shutdown() {
            logger::warning(LogTag::System, "Trader already stopping");
        }
    })
    .context("installing Ctrl-C handler")?;

    #[cfg(feature = "web")]
    {
        if config.webserver.enabled {
            spawn_webserver(&config, control.clone());
        }
    }

    dispatch(
        &notifier,
        Notification::new(NotificationType::BotStarted {
            version: VERSION.to_string(),
            mode: "paper".to_string(),
        }),
    );

    let ctx = TraderContext::new(&config, services);
    let store = Scheduler::new(ctx, store, receiver, paused).run().await;
    logger::info(
        LogTag::System,
        &format!("Shutdown complete, {} positions saved", store.len()),
    );
    Ok(())
}

fn load_config() -> Result<Config> {
    // Missing .env is fine
    let _ = dotenv::dotenv();

    let path = paths::get_config_path();
    let first_run = !path.exists();
    let mut config = config::load_config_from_path(&path)?;
    if first_run {
        match config::save_config(&config, &path) {
            Ok(()) => logger::info(
                LogTag::Config,
                &format!("Wrote default configuration to {}", path.display()),
            ),
            Err(e) => logger::warning(LogTag::Config, &format!("{}", e)),
        }
    }
    config::apply_env_overrides(&mut config);
    config.validate()?;

    if config.trader.treasury_address.is_empty() {
        logger::warning(
            LogTag::Config,
            "No treasury address configured; profit tax will be logged for reconciliation only",
        );
    }
    match config.strategy.designated_asset() {
        Some(asset) => logger::info(
            LogTag::Config,
            &format!("Designated asset: {}", logger::short_id(asset)),
        ),
        None => logger::debug(LogTag::Config, "No designated asset configured"),
    }
    logger::info(
        LogTag::Config,
        &format!("Configuration loaded from {}", path.display()),
    );
    Ok(config)
}

fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    #[cfg(feature = "telegram")]
    {
        if config.telegram.enabled || !config.telegram.bot_token.is_empty() {
            match skrybot::notifications::TelegramNotifier::from_config(&config.telegram) {
                Ok(notifier) => {
                    logger::info(LogTag::Telegram, "Telegram notifications enabled");
                    return Arc::new(notifier);
                }
                Err(e) => logger::warning(
                    LogTag::Telegram,
                    &format!("Telegram disabled: {}", e),
                ),
            }
        }
    }

    #[cfg(not(feature = "telegram"))]
    let _ = config;

    Arc::new(LogNotifier)
}

#[cfg(feature = "web")]
fn spawn_webserver(config: &Config, control: skrybot::trader::ControlHandle) {
    let web_config = config.webserver.clone();
    let mut status = control.subscribe();
    tokio::spawn(async move {
        // Stop serving once the worker reports it is no longer running
        let shutdown = async move {
            let _ = status.wait_for(|s| s.running).await;
            let _ = status.wait_for(|s| !s.running).await;
        };
        if let Err(e) = skrybot::webserver::start_server(&web_config, control, shutdown).await {
            logger::error(LogTag::Webserver, &format!("Webserver error: {}", e));
        }
    });
}
