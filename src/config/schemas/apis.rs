/// External API and execution configuration
use crate::config_struct;

config_struct! {
    /// Jupiter quote, price and token endpoints
    pub struct JupiterConfig {
        api_base_url: String = "https://lite-api.jup.ag".to_string(),
        /// Optional key for higher rate limits (sent as x-api-key)
        api_key: String = String::new(),
        timeout_secs: u64 = 10,
    }
}

config_struct! {
    /// Rugcheck token reports
    pub struct RugcheckConfig {
        api_base_url: String = "https://api.rugcheck.xyz/v1".to_string(),
        /// Highest acceptable risk score (lower is safer)
        max_risk_score: f64 = 100.0,
        timeout_secs: u64 = 10,
    }
}

config_struct! {
    /// Simulated wallet used by the paper executor
    pub struct PaperConfig {
        starting_balance_sol: f64 = 1.0,
    }
}
