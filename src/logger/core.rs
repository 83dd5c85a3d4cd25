/// Level and tag gating in front of the formatter
///
/// The active `LoggerConfig` is read once per message; every rule below is
/// evaluated against that snapshot.
use super::config::{get_logger_config, LoggerConfig};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Decide whether a message passes the given configuration
///
/// Rules, in order:
/// 1. ERROR always passes (RECONCILE lines must never be filtered)
/// 2. Anything above `min_level` is dropped (`--quiet` lowers it to WARNING)
/// 3. DEBUG needs `--debug-<tag>`, `--debug-all` or `--verbose-<tag>`
/// 4. VERBOSE needs `--verbose` or `--verbose-<tag>`
/// 5. A non-empty tag allow-list restricts WARNING and INFO
pub fn passes(config: &LoggerConfig, tag: &LogTag, level: LogLevel) -> bool {
    // Rule 1
    if level == LogLevel::Error {
        return true;
    }

    // Rule 2
    if level > config.min_level {
        return false;
    }

    match level {
        // Rule 3
        LogLevel::Debug => config.debug_enabled(tag),
        // Rule 4
        LogLevel::Verbose => config.verbose_enabled(tag),
        // Rule 5: empty set means every tag
        _ => config.enabled_tags.is_empty() || config.enabled_tags.contains(&tag.to_debug_key()),
    }
}

/// Gate against the active configuration, then format and write
pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if passes(&get_logger_config(), &tag, level) {
        super::format::format_and_log(tag, level, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::config_from_args;

    fn cfg(flags: &[&str]) -> LoggerConfig {
        let mut args = vec!["skrybot".to_string()];
        args.extend(flags.iter().map(|f| f.to_string()));
        config_from_args(&args)
    }

    #[test]
    fn test_defaults_show_info_not_debug() {
        let config = cfg(&[]);
        assert!(passes(&config, &LogTag::Trader, LogLevel::Info));
        assert!(passes(&config, &LogTag::Trader, LogLevel::Warning));
        assert!(!passes(&config, &LogTag::Trader, LogLevel::Debug));
        assert!(!passes(&config, &LogTag::Trader, LogLevel::Verbose));
    }

    #[test]
    fn test_quiet_still_shows_errors() {
        let config = cfg(&["--quiet"]);
        assert!(!passes(&config, &LogTag::Trader, LogLevel::Info));
        assert!(passes(&config, &LogTag::Treasury, LogLevel::Warning));
        assert!(passes(&config, &LogTag::Treasury, LogLevel::Error));
    }

    #[test]
    fn test_debug_is_per_tag() {
        let config = cfg(&["--debug-swap"]);
        assert!(passes(&config, &LogTag::Swap, LogLevel::Debug));
        assert!(!passes(&config, &LogTag::Positions, LogLevel::Debug));
        assert!(!passes(&config, &LogTag::Swap, LogLevel::Verbose));
    }

    #[test]
    fn test_verbose_tag_implies_debug() {
        let config = cfg(&["--verbose-positions"]);
        assert!(passes(&config, &LogTag::Positions, LogLevel::Debug));
        assert!(passes(&config, &LogTag::Positions, LogLevel::Verbose));
        assert!(!passes(&config, &LogTag::Swap, LogLevel::Verbose));
    }

    #[test]
    fn test_allow_list_keeps_errors() {
        let mut config = cfg(&[]);
        config.enabled_tags.insert(LogTag::Trader.to_debug_key());
        assert!(passes(&config, &LogTag::Trader, LogLevel::Info));
        assert!(!passes(&config, &LogTag::Swap, LogLevel::Info));
        assert!(passes(&config, &LogTag::Swap, LogLevel::Error));
    }
}
