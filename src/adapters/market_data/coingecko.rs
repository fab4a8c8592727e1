//! CoinGecko Price Client
//!
//! Fetches the USD quote for the tracked jetton from the CoinGecko simple
//! price endpoint, and optionally polls it on a fixed interval. A missing
//! quote is reported as `None` ("price unavailable"), never as an error.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ports::price::{PriceError, PriceFeedPort};

const COINGECKO_PRICE_API: &str = "https://api.coingecko.com/api/v3/simple/price";

/// CoinGecko client configuration
#[derive(Debug, Clone)]
pub struct CoingeckoConfig {
    /// CoinGecko coin id (e.g. "gram-2")
    pub coin_id: String,
    /// Quote currency, usd unless configured otherwise
    pub vs_currency: String,
    /// Request timeout
    pub timeout: Duration,
    /// Poll cadence for [`PricePoller`]
    pub poll_interval: Duration,
}

impl Default for CoingeckoConfig {
    fn default() -> Self {
        Self {
            coin_id: "the-open-network".to_string(),
            vs_currency: "usd".to_string(),
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(60),
        }
    }
}

/// CoinGecko simple-price client
#[derive(Debug, Clone)]
pub struct CoingeckoClient {
    config: CoingeckoConfig,
    http: Client,
}

impl CoingeckoClient {
    pub fn new(config: CoingeckoConfig) -> Result<Self, PriceError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PriceError::ApiError(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    /// Fetch the current quote. `Ok(None)` means the source has no numeric
    /// price for the coin right now.
    pub async fn fetch_price(&self) -> Result<Option<f64>, PriceError> {
        let response = self
            .http
            .get(COINGECKO_PRICE_API)
            .query(&[
                ("ids", self.config.coin_id.as_str()),
                ("vs_currencies", self.config.vs_currency.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PriceError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PriceError::ApiError(format!(
                "price API returned status {}",
                response.status()
            )));
        }

        let quotes: HashMap<String, QuoteEntry> = response
            .json()
            .await
            .map_err(|e| PriceError::ParseError(e.to_string()))?;

        Ok(quotes
            .get(&self.config.coin_id)
            .and_then(|entry| entry.quote(&self.config.vs_currency)))
    }

    pub fn config(&self) -> &CoingeckoConfig {
        &self.config
    }
}

#[async_trait]
impl PriceFeedPort for CoingeckoClient {
    async fn usd_price(&self) -> Result<Option<f64>, PriceError> {
        self.fetch_price().await
    }
}

/// One coin's quotes keyed by currency
#[derive(Debug, Deserialize)]
struct QuoteEntry(HashMap<String, serde_json::Value>);

impl QuoteEntry {
    fn quote(&self, currency: &str) -> Option<f64> {
        self.0.get(currency).and_then(serde_json::Value::as_f64)
    }
}

/// Fixed-interval price poller.
///
/// Publishes the latest quote on a watch channel. A fetch failure keeps
/// the previous value and logs a warning.
pub struct PricePoller {
    client: CoingeckoClient,
}

impl PricePoller {
    pub fn new(client: CoingeckoClient) -> Self {
        Self { client }
    }

    /// Spawn the poll loop. The receiver starts at `None` and follows the
    /// latest successful fetch.
    pub fn spawn(self) -> (watch::Receiver<Option<f64>>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(None);
        let interval = self.client.config.poll_interval;

        let handle = tokio::spawn(async move {
            loop {
                match self.client.fetch_price().await {
                    Ok(price) => {
                        if tx.send(price).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("price poll failed: {}", e);
                    }
                }
                tokio::time::sleep(interval).await;
            }
        });

        (rx, handle)
    }
}
