/// Rugcheck risk reports
///
/// Endpoint: /v1/tokens/{mint}/report. Lower scores are safer; a report
/// without a score is treated as maximally risky.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::RugcheckConfig;
use crate::errors::{BotError, BotResult};
use crate::logger::{self, LogTag};

/// Score assumed when the API omits one
const MISSING_SCORE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub score: f64,
    pub risks: Vec<RiskItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
    pub name: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub description: String,
}

impl RiskReport {
    pub fn is_trusted(&self, max_risk_score: f64) -> bool {
        self.score <= max_risk_score
    }
}

/// Safety screening for candidate tokens
#[async_trait]
pub trait RiskOracle: Send + Sync {
    /// Ok(None) when no report exists for the asset
    async fn report(&self, asset_id: &str) -> BotResult<Option<RiskReport>>;
}

#[derive(Debug, Deserialize)]
struct RugcheckResponse {
    score: Option<f64>,
    #[serde(default)]
    risks: Option<Vec<RugcheckRisk>>,
}

#[derive(Debug, Deserialize)]
struct RugcheckRisk {
    name: String,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<RugcheckResponse> for RiskReport {
    fn from(r: RugcheckResponse) -> Self {
        RiskReport {
            score: r.score.unwrap_or(MISSING_SCORE),
            risks: r
                .risks
                .unwrap_or_default()
                .into_iter()
                .map(|risk| RiskItem {
                    name: risk.name,
                    level: risk.level.unwrap_or_default(),
                    description: risk.description.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

pub struct RugcheckClient {
    client: Client,
    base_url: String,
}

impl RugcheckClient {
    pub fn new(config: &RugcheckConfig) -> BotResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BotError::Network(format!("Failed to build Rugcheck client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RiskOracle for RugcheckClient {
    async fn report(&self, asset_id: &str) -> BotResult<Option<RiskReport>> {
        let url = format!("{}/tokens/{}/report", self.base_url, asset_id);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            logger::debug(LogTag::Security, &format!("No Rugcheck report for {}", asset_id));
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(BotError::api(
                "rugcheck",
                format!("HTTP {} for {}", response.status(), asset_id),
            ));
        }

        let body: RugcheckResponse = response
            .json()
            .await
            .map_err(|e| BotError::api("rugcheck", format!("parse failed: {}", e)))?;
        Ok(Some(body.into()))
    }
}
