//! Centralized path resolution for skrybot
//!
//! Everything lives under one base directory:
//! - `--data-dir <path>` when given
//! - otherwise the platform data dir (`dirs::data_local_dir()/skrybot`)
//!
//! ```text
//! <base>/
//! ├── data/
//! │ ├── config.toml
//! │ ├── positions.json
//! │ └── trades.csv
//! └── logs/
//!   └── skrybot_YYYY-MM-DD.log
//! ```

use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "skrybot";

static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

fn resolve_base_directory() -> PathBuf {
    if let Some(dir) = crate::arguments::get_data_dir_override() {
        return dir;
    }

    if let Some(dir) = dirs::data_local_dir() {
        return dir.join(APP_DIR);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(APP_DIR);
    }

    PathBuf::from(APP_DIR)
}

pub fn get_base_directory() -> PathBuf {
    BASE_DIRECTORY.clone()
}

pub fn get_data_directory() -> PathBuf {
    BASE_DIRECTORY.join("data")
}

pub fn get_logs_directory() -> PathBuf {
    BASE_DIRECTORY.join("logs")
}

/// Config file, honoring `--config`
pub fn get_config_path() -> PathBuf {
    crate::arguments::get_config_path_override()
        .unwrap_or_else(|| get_data_directory().join("config.toml"))
}

pub fn get_positions_path() -> PathBuf {
    get_data_directory().join("positions.json")
}

pub fn get_trades_log_path() -> PathBuf {
    get_data_directory().join("trades.csv")
}

/// Create the data and logs directories
pub fn ensure_all_directories() -> Result<(), String> {
    for dir in [get_data_directory(), get_logs_directory()] {
        ensure_directory(&dir)?;
    }
    Ok(())
}

fn ensure_directory(dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create directory '{}': {}", dir.display(), e))
}
