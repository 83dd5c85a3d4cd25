/// Logger configuration and command-line flag parsing
///
/// Flags understood:
/// - `--debug-<tag>` enables DEBUG output for one tag (`--debug-all` for every tag)
/// - `--verbose` enables VERBOSE output everywhere, `--verbose-<tag>` for one tag
/// - `--quiet` drops the threshold to WARNING
/// - `--no-log-file` disables file persistence
use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::get_cmd_args;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped (Debug/Verbose have extra gating)
    pub min_level: LogLevel,
    /// Tags with --debug-<tag> enabled
    pub debug_tags: HashSet<String>,
    /// Tags with --verbose-<tag> enabled
    pub verbose_tags: HashSet<String>,
    /// --verbose was passed
    pub verbose_all: bool,
    /// When non-empty, only these tags are printed (errors always pass)
    pub enabled_tags: HashSet<String>,
    /// Write every line to the log file as well
    pub file_logging: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            verbose_all: false,
            enabled_tags: HashSet::new(),
            file_logging: true,
        }
    }
}

impl LoggerConfig {
    /// DEBUG output for `tag` (a --verbose-<tag> flag implies it)
    pub fn debug_enabled(&self, tag: &LogTag) -> bool {
        let key = tag.to_debug_key();
        self.debug_tags.contains(&key) || self.verbose_tags.contains(&key)
    }

    /// VERBOSE output for `tag`
    pub fn verbose_enabled(&self, tag: &LogTag) -> bool {
        self.verbose_all || self.verbose_tags.contains(&tag.to_debug_key())
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Get a copy of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    match LOGGER_CONFIG.read() {
        Ok(cfg) => cfg.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Replace the logger configuration
pub fn set_logger_config(config: LoggerConfig) {
    match LOGGER_CONFIG.write() {
        Ok(mut cfg) => *cfg = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Build the logger configuration from process arguments
pub fn init_from_args() {
    set_logger_config(config_from_args(&get_cmd_args()));
}

pub(crate) fn config_from_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    for arg in args {
        if arg == "--debug-all" {
            for tag in LogTag::all() {
                config.debug_tags.insert(tag.to_debug_key());
            }
        } else if let Some(tag) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(tag.to_lowercase());
        } else if arg == "--verbose" {
            config.verbose_all = true;
            config.min_level = LogLevel::Verbose;
        } else if let Some(tag) = arg.strip_prefix("--verbose-") {
            config.verbose_tags.insert(tag.to_lowercase());
        } else if arg == "--quiet" {
            config.min_level = LogLevel::Warning;
        } else if arg == "--no-log-file" {
            config.file_logging = false;
        }
    }

    // Debug flags must lift the threshold or the level check drops them first
    if (!config.debug_tags.is_empty() || !config.verbose_tags.is_empty())
        && config.min_level < LogLevel::Verbose
    {
        config.min_level = LogLevel::Verbose;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_debug_flags_collected() {
        let config = config_from_args(&args(&["skrybot", "--debug-trader", "--debug-Swap"]));
        assert!(config.debug_tags.contains("trader"));
        assert!(config.debug_tags.contains("swap"));
        assert_eq!(config.min_level, LogLevel::Verbose);
    }

    #[test]
    fn test_quiet_without_debug() {
        let config = config_from_args(&args(&["skrybot", "--quiet", "--no-log-file"]));
        assert_eq!(config.min_level, LogLevel::Warning);
        assert!(!config.file_logging);
        assert!(config.debug_tags.is_empty());
    }

    #[test]
    fn test_debug_all_covers_every_tag() {
        let config = config_from_args(&args(&["skrybot", "--debug-all"]));
        assert_eq!(config.debug_tags.len(), LogTag::all().len());
    }
}
