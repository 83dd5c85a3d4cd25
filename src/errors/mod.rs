/// Crate-wide error type
///
/// Collaborator adapters and the store return `BotError`; orchestrators decide
/// per unit of work whether a failure skips the position/candidate or aborts
/// the cycle.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error from {service}: {message}")]
    Api { service: String, message: String },

    #[error("Timeout error: {operation} timed out after {seconds} seconds")]
    Timeout { operation: String, seconds: u64 },

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("Insufficient funds: need {needed} SOL, have {available} SOL")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("Position store error: {0}")]
    Store(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Trade log error: {0}")]
    Csv(#[from] csv::Error),
}

impl BotError {
    pub fn api(service: &str, message: impl Into<String>) -> Self {
        BotError::Api {
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn timeout(operation: &str, seconds: u64) -> Self {
        BotError::Timeout {
            operation: operation.to_string(),
            seconds,
        }
    }

    /// Transient failures that the next cycle retries naturally
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BotError::Network(_) | BotError::Api { .. } | BotError::Timeout { .. }
        )
    }
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BotError::Network(format!("request timed out: {}", e))
        } else {
            BotError::Network(e.to_string())
        }
    }
}

pub type BotResult<T> = Result<T, BotError>;
