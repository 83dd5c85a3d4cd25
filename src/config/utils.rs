use super::schemas::Config;
/// Configuration utilities - loading, saving, environment overrides, validation
use crate::errors::BotError;
use crate::logger::{self, LogTag};
use chrono::NaiveDate;
use std::path::Path;

/// Load configuration from a TOML file
///
/// A missing file yields defaults; missing fields inside the file take their
/// schema defaults.
pub fn load_config_from_path(path: &Path) -> Result<Config, BotError> {
    if !path.exists() {
        logger::warning(
            LogTag::Config,
            &format!(
                "Config file '{}' not found, using default values",
                path.display()
            ),
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        BotError::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    toml::from_str::<Config>(&contents).map_err(|e| {
        BotError::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Write a configuration to disk as pretty TOML
pub fn save_config(config: &Config, path: &Path) -> Result<(), BotError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| BotError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents).map_err(|e| {
        BotError::Config(format!(
            "Failed to write config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Apply secrets and deployment values from the process environment
///
/// Recognized: TREASURY_ADDRESS, DESIGNATED_ASSET, TELEGRAM_BOT_TOKEN,
/// TELEGRAM_CHAT_ID, JUPITER_API_KEY. Empty variables are ignored.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

pub(crate) fn apply_overrides_from<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(v) = get("TREASURY_ADDRESS") {
        config.trader.treasury_address = v;
    }
    if let Some(v) = get("DESIGNATED_ASSET") {
        config.strategy.designated_asset = v;
    }
    if let Some(v) = get("TELEGRAM_BOT_TOKEN") {
        config.telegram.bot_token = v;
    }
    if let Some(v) = get("TELEGRAM_CHAT_ID") {
        config.telegram.chat_id = v;
    }
    if let Some(v) = get("JUPITER_API_KEY") {
        config.jupiter.api_key = v;
    }
}

/// Reject configurations the trading loop cannot run safely with
pub fn validate_config(config: &Config) -> Result<(), BotError> {
    let s = &config.strategy;
    let m = &config.money;
    let t = &config.trader;

    for (name, value) in [
        ("strategy.tier1_sell_fraction", s.tier1_sell_fraction),
        ("strategy.tier2_sell_fraction", s.tier2_sell_fraction),
        ("strategy.tier3_sell_fraction", s.tier3_sell_fraction),
        ("strategy.designated_target_sell_fraction", s.designated_target_sell_fraction),
        ("money.position_size_pct", m.position_size_pct),
    ] {
        if !(value > 0.0 && value <= 1.0) {
            return Err(BotError::Config(format!("{} must be in (0, 1], got {}", name, value)));
        }
    }

    for (name, value) in [
        ("strategy.designated_trailing_stop", s.designated_trailing_stop),
        ("strategy.moonbag_trailing_stop", s.moonbag_trailing_stop),
    ] {
        if !(value > 0.0 && value < 1.0) {
            return Err(BotError::Config(format!("{} must be in (0, 1), got {}", name, value)));
        }
    }

    if !(0.0..=1.0).contains(&m.tax_rate) {
        return Err(BotError::Config(format!(
            "money.tax_rate must be in [0, 1], got {}",
            m.tax_rate
        )));
    }

    if !(s.tier1_gain > 0.0 && s.tier1_gain < s.tier2_gain && s.tier2_gain < s.tier3_gain) {
        return Err(BotError::Config(format!(
            "tier gains must be positive and ascending, got {} / {} / {}",
            s.tier1_gain, s.tier2_gain, s.tier3_gain
        )));
    }

    if s.designated_target_gain <= 0.0 {
        return Err(BotError::Config(
            "strategy.designated_target_gain must be positive".to_string(),
        ));
    }

    // 2024 is a leap year so Feb 29 is accepted as a bound
    for (month, day) in [
        (s.lockdown_start_month, s.lockdown_start_day),
        (s.lockdown_end_month, s.lockdown_end_day),
    ] {
        if NaiveDate::from_ymd_opt(2024, month, day).is_none() {
            return Err(BotError::Config(format!(
                "invalid lockdown bound {:02}-{:02}",
                month, day
            )));
        }
    }

    if m.min_trade_size_sol < 0.0 || m.dust_threshold < 0.0 {
        return Err(BotError::Config(
            "money.min_trade_size_sol and money.dust_threshold must be non-negative".to_string(),
        ));
    }

    if t.cycle_interval_secs == 0 || t.call_timeout_secs == 0 {
        return Err(BotError::Config(
            "trader.cycle_interval_secs and trader.call_timeout_secs must be positive".to_string(),
        ));
    }

    if !t.treasury_address.is_empty() && !is_valid_address(&t.treasury_address) {
        return Err(BotError::Config(format!(
            "trader.treasury_address '{}' is not a valid base58 address",
            t.treasury_address
        )));
    }

    if let Some(asset) = s.designated_asset() {
        if !is_valid_address(asset) {
            return Err(BotError::Config(format!(
                "strategy.designated_asset '{}' is not a valid base58 address",
                asset
            )));
        }
    }

    Ok(())
}

/// 32-byte base58 public key
pub fn is_valid_address(address: &str) -> bool {
    matches!(bs58::decode(address).into_vec(), Ok(bytes) if bytes.len() == 32)
}
