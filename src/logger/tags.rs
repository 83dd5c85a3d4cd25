/// Log tags identifying the subsystem that emitted a message
///
/// The debug key of a tag is what `--debug-<key>` matches against.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Trader,
    Strategy,
    Positions,
    Discovery,
    Security,
    Swap,
    Wallet,
    Treasury,
    Notifications,
    Telegram,
    Webserver,
}

impl LogTag {
    /// Key used by --debug-<key> / --verbose-<key> flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system",
            LogTag::Config => "config",
            LogTag::Trader => "trader",
            LogTag::Strategy => "strategy",
            LogTag::Positions => "positions",
            LogTag::Discovery => "discovery",
            LogTag::Security => "security",
            LogTag::Swap => "swap",
            LogTag::Wallet => "wallet",
            LogTag::Treasury => "treasury",
            LogTag::Notifications => "notifications",
            LogTag::Telegram => "telegram",
            LogTag::Webserver => "webserver",
        }
        .to_string()
    }

    /// Uppercase label written to the log file (no color codes)
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Trader => "TRADER",
            LogTag::Strategy => "STRATEGY",
            LogTag::Positions => "POSITIONS",
            LogTag::Discovery => "DISCOVER",
            LogTag::Security => "SECURITY",
            LogTag::Swap => "SWAP",
            LogTag::Wallet => "WALLET",
            LogTag::Treasury => "TREASURY",
            LogTag::Notifications => "NOTIFY",
            LogTag::Telegram => "TELEGRAM",
            LogTag::Webserver => "WEBSERVER",
        }
        .to_string()
    }

    /// All tags, used when --debug-all is passed
    pub fn all() -> &'static [LogTag] {
        &[
            LogTag::System,
            LogTag::Config,
            LogTag::Trader,
            LogTag::Strategy,
            LogTag::Positions,
            LogTag::Discovery,
            LogTag::Security,
            LogTag::Swap,
            LogTag::Wallet,
            LogTag::Treasury,
            LogTag::Notifications,
            LogTag::Telegram,
            LogTag::Webserver,
        ]
    }
}
