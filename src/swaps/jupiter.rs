/// Jupiter client: quotes, spot prices, token decimals and new listings
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

use super::{to_raw_amount, Quote, QuoteProvider};
use crate::config::{JupiterConfig, SOL_MINT};
use crate::discovery::TokenSource;
use crate::errors::{BotError, BotResult};
use crate::logger::{self, LogTag};

const SOL_DECIMALS: u8 = 9;

// ============================================================================
// API TYPES
// ============================================================================

#[derive(Debug, Serialize)]
struct JupiterQuoteRequest<'a> {
    #[serde(rename = "inputMint")]
    input_mint: &'a str,
    #[serde(rename = "outputMint")]
    output_mint: &'a str,
    amount: String,
    #[serde(rename = "slippageBps")]
    slippage_bps: u16,
}

#[derive(Debug, Deserialize)]
struct JupiterQuoteResponse {
    #[serde(rename = "inAmount")]
    in_amount: String,
    #[serde(rename = "outAmount")]
    out_amount: String,
    #[serde(rename = "priceImpactPct", default)]
    price_impact_pct: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JupiterToken {
    id: String,
    decimals: u8,
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct JupiterClient {
    client: Client,
    config: JupiterConfig,
    slippage_bps: u16,
    decimals: RwLock<HashMap<String, u8>>,
    /// Mints seen by the listing scan; None until the first scan seeds it
    known_tokens: Mutex<Option<HashSet<String>>>,
}

impl JupiterClient {
    pub fn new(config: JupiterConfig, slippage_bps: u16) -> BotResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BotError::Network(format!("Failed to build Jupiter client: {}", e)))?;

        let mut decimals = HashMap::new();
        decimals.insert(SOL_MINT.to_string(), SOL_DECIMALS);

        Ok(Self {
            client,
            config,
            slippage_bps,
            decimals: RwLock::new(decimals),
            known_tokens: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(self.url(path));
        if self.config.api_key.is_empty() {
            request
        } else {
            request.header("x-api-key", &self.config.api_key)
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> BotResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| BotError::Network(format!("Jupiter {} request failed: {}", what, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown".to_string());
            return Err(BotError::api(
                "jupiter",
                format!("{} failed ({}): {}", what, status, error_text),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BotError::api("jupiter", format!("{} parse failed: {}", what, e)))
    }

    /// Token decimals, cached after the first lookup
    pub async fn token_decimals(&self, mint: &str) -> BotResult<u8> {
        if let Some(d) = self.decimals.read().await.get(mint) {
            return Ok(*d);
        }

        let tokens: Vec<JupiterToken> = self
            .get_json(
                self.get("/tokens/v2/search").query(&[("query", mint)]),
                "token lookup",
            )
            .await?;

        let decimals = tokens
            .into_iter()
            .find(|t| t.id == mint)
            .map(|t| t.decimals)
            .ok_or_else(|| BotError::api("jupiter", format!("unknown token {}", mint)))?;

        self.decimals.write().await.insert(mint.to_string(), decimals);
        Ok(decimals)
    }
}

#[async_trait]
impl QuoteProvider for JupiterClient {
    async fn quote(&self, input_mint: &str, output_mint: &str, amount: f64) -> BotResult<Quote> {
        let in_decimals = self.token_decimals(input_mint).await?;
        let out_decimals = self.token_decimals(output_mint).await?;

        let raw_amount = to_raw_amount(amount, in_decimals);
        if raw_amount == 0 {
            return Err(BotError::InvalidInput(format!(
                "quote amount {} rounds to zero",
                amount
            )));
        }

        let request = JupiterQuoteRequest {
            input_mint,
            output_mint,
            amount: raw_amount.to_string(),
            slippage_bps: self.slippage_bps,
        };

        logger::debug(
            LogTag::Swap,
            &format!(
                "Jupiter quote request: {} {} → {} (slippage: {}bps)",
                raw_amount, input_mint, output_mint, self.slippage_bps
            ),
        );

        let start = Instant::now();
        let response: JupiterQuoteResponse = self
            .get_json(self.get("/swap/v1/quote").query(&request), "quote")
            .await?;

        let parse = |field: &str, value: &str| {
            value
                .parse::<u64>()
                .map_err(|e| BotError::api("jupiter", format!("invalid {} '{}': {}", field, value, e)))
        };
        let in_amount = parse("inAmount", &response.in_amount)?;
        let out_amount = parse("outAmount", &response.out_amount)?;

        let price_impact_pct = response
            .price_impact_pct
            .as_deref()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(0.0);

        logger::debug(
            LogTag::Swap,
            &format!(
                "Jupiter quote: {} out, {:.4}% impact in {}ms",
                out_amount,
                price_impact_pct,
                start.elapsed().as_millis()
            ),
        );

        Ok(Quote {
            input_mint: input_mint.to_string(),
            output_mint: output_mint.to_string(),
            in_amount,
            out_amount,
            in_decimals,
            out_decimals,
            price_impact_pct,
            slippage_bps: self.slippage_bps,
        })
    }

    /// Priced by quoting one whole token into SOL
    async fn current_price(&self, asset_id: &str) -> BotResult<f64> {
        let quote = self.quote(asset_id, SOL_MINT, 1.0).await?;
        quote
            .price_in(SOL_MINT)
            .ok_or_else(|| BotError::api("jupiter", format!("no price for {}", asset_id)))
    }
}

#[async_trait]
impl TokenSource for JupiterClient {
    async fn scan_new_tokens(&self) -> BotResult<Vec<String>> {
        let tokens: Vec<JupiterToken> = self
            .get_json(self.get("/tokens/v2/recent"), "recent tokens")
            .await?;

        {
            let mut cache = self.decimals.write().await;
            for token in &tokens {
                cache.entry(token.id.clone()).or_insert(token.decimals);
            }
        }

        let current: HashSet<String> = tokens.into_iter().map(|t| t.id).collect();
        let mut known = self.known_tokens.lock().await;
        Ok(diff_listing(&mut known, current))
    }
}

/// Newly listed mints relative to `known`; the first call seeds and reports none
fn diff_listing(known: &mut Option<HashSet<String>>, current: HashSet<String>) -> Vec<String> {
    match known {
        None => {
            logger::info(
                LogTag::Discovery,
                &format!("Initialized scan with {} tokens", current.len()),
            );
            *known = Some(current);
            Vec::new()
        }
        Some(seen) => {
            let mut fresh: Vec<String> = current.difference(seen).cloned().collect();
            fresh.sort();
            seen.extend(fresh.iter().cloned());
            if !fresh.is_empty() {
                logger::info(LogTag::Discovery, &format!("Found {} new tokens", fresh.len()));
            }
            fresh
        }
    }
}
