pub mod arguments;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod logger;
pub mod money;
pub mod notifications;
pub mod paths;
pub mod positions;
pub mod rugcheck;
pub mod strategy;
pub mod swaps;
pub mod trade_log;
pub mod trader;

#[cfg(feature = "web")]
pub mod webserver;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
