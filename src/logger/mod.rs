//! Structured logging system for skrybot
//!
//! This module provides a small, ergonomic logging API with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Dual output: colored console + file persistence
//!
//! ## Usage
//!
//! ```rust
//! use skrybot::logger::{self, LogTag};
//!
//! logger::error(LogTag::Swap, "Quote request failed");
//! logger::warning(LogTag::Security, "Risk report missing");
//! logger::info(LogTag::Trader, "Position opened");
//! logger::debug(LogTag::Strategy, "Decision details: ..."); // Only if --debug-strategy
//! logger::verbose(LogTag::Positions, "Raw position: ..."); // Only if --verbose
//! ```
//!
//! ## Initialization
//!
//! Call once at startup, after the data directories exist:
//! ```no_run
//! # use skrybot::logger;
//! logger::init();
//! ```

mod config;
mod core;
mod file;
mod format;
mod levels;
mod special;
mod tags;

pub use config::{get_logger_config, init_from_args, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use special::{log_price_change, short_id};
pub use tags::LogTag;

/// Initialize the logger system
///
/// Parses command-line debug flags and opens the log file. Call once, before
/// any service starts.
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (shown unless --quiet)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level
///
/// Only shown when the matching --debug-<module> flag is provided.
///
/// # Example
/// ```rust
/// # use skrybot::logger::{self, LogTag};
/// // Only shown with --debug-swap
/// logger::debug(LogTag::Swap, "Quote payload: {...}");
/// ```
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (only with --verbose or --verbose-<module>)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush all pending log writes
///
/// Call this during shutdown to ensure all logs are written to disk.
pub fn flush() {
    file::flush_file_logging();
}
