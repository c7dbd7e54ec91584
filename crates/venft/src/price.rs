use std::collections::HashMap;

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, PriceError};

/// Source of USD spot prices for tokens.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn usd_price(&self, token: Address) -> Result<f64, PriceError>;
}

/// Fetch a price, degrading any failure to `0.0`.
///
/// The price only decorates a lookup result, so failures are logged and
/// swallowed here rather than propagated.
pub async fn price_or_zero(source: &dyn PriceSource, token: Address) -> f64 {
    match source.usd_price(token).await {
        Ok(price) => {
            debug!(token = %token, price, "fetched usd price");
            price
        }
        Err(e) => {
            warn!(token = %token, error = %e, "price unavailable, using 0");
            0.0
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokensResponse {
    #[serde(default)]
    pairs: Option<Vec<PairRecord>>,
}

#[derive(Debug, Deserialize)]
struct PairRecord {
    #[serde(rename = "priceUsd")]
    #[serde(default)]
    price_usd: Option<String>,
}

/// DexScreener `latest/dex/tokens` client.
pub struct DexScreenerClient {
    client: reqwest::Client,
    base_url: String,
}

impl DexScreenerClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self::with_client(config.http_client()?, &config.price_api_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn token_url(&self, token: Address) -> String {
        format!("{}/latest/dex/tokens/{}", self.base_url, token.to_checksum(None))
    }
}

#[async_trait]
impl PriceSource for DexScreenerClient {
    async fn usd_price(&self, token: Address) -> Result<f64, PriceError> {
        let response = self
            .client
            .get(self.token_url(token))
            .send()
            .await
            .map_err(|e| PriceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PriceError::Transport(e.to_string()))?;
        parse_tokens_response(&body)
    }
}

/// USD price of the first trading pair in a `latest/dex/tokens` response.
pub fn parse_tokens_response(body: &str) -> Result<f64, PriceError> {
    let response: TokensResponse =
        serde_json::from_str(body).map_err(|e| PriceError::Malformed(e.to_string()))?;

    let first = response
        .pairs
        .and_then(|pairs| pairs.into_iter().next())
        .ok_or(PriceError::NoPairs)?;

    let raw = first
        .price_usd
        .ok_or_else(|| PriceError::Malformed("first pair has no priceUsd".to_string()))?;
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| PriceError::Malformed(format!("unparsable priceUsd {raw:?}")))?;

    if !price.is_finite() || price < 0.0 {
        return Err(PriceError::Malformed(format!("priceUsd out of range: {raw:?}")));
    }
    Ok(price)
}

/// In-memory price source for testing; unknown tokens have no pairs.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    prices: HashMap<Address, f64>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: Address, price: f64) {
        self.prices.insert(token, price);
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn usd_price(&self, token: Address) -> Result<f64, PriceError> {
        self.prices.get(&token).copied().ok_or(PriceError::NoPairs)
    }
}
