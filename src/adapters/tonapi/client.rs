//! TonAPI Client
//!
//! HTTP client for the TonAPI jetton index with a hard floor on request
//! cadence. The free tier tolerates roughly one request every four seconds;
//! holding a bearer credential buys a faster tier until the server rejects
//! it, at which point the client drops back to anonymous mode on its own.
//!
//! Recovery is bounded: one retry after a 429 (honoring `retry-after`),
//! one anonymous retry after a 401/403. Everything else is surfaced to the
//! caller as a typed error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::{HolderRecord, TokenMeta};
use crate::ports::ledger::{LedgerError, LedgerIndexPort};

use super::decode;

/// TonAPI client configuration
#[derive(Debug, Clone)]
pub struct TonapiConfig {
    /// Base URL for the TonAPI v2 REST interface
    pub base_url: String,
    /// Optional bearer credential for the faster request tier
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Minimum gap between requests without a credential
    pub anonymous_gap: Duration,
    /// Minimum gap between requests with a credential
    pub authenticated_gap: Duration,
    /// Backoff used for a 429 without a `retry-after` header
    pub retry_fallback: Duration,
}

impl Default for TonapiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tonapi.io/v2".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            anonymous_gap: Duration::from_millis(4000),
            authenticated_gap: Duration::from_millis(1000),
            retry_fallback: Duration::from_secs(4),
        }
    }
}

/// Minimum-gap throttle owned by one client instance.
///
/// A plain floor on cadence, not a token bucket: every call re-checks the
/// gap, so bursts cannot slip through. No state is shared across clients.
#[derive(Debug)]
pub struct RateLimiter {
    min_gap: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_gap: Duration) -> Self {
        Self {
            min_gap,
            last_request: None,
        }
    }

    pub fn min_gap(&self) -> Duration {
        self.min_gap
    }

    pub fn set_min_gap(&mut self, gap: Duration) {
        self.min_gap = gap;
    }

    /// Sleep until the gap since the previous request has elapsed, then
    /// stamp the request time.
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_gap {
                tokio::time::sleep(self.min_gap - elapsed).await;
            }
        }
        self.record();
    }

    /// Stamp the request time without waiting. Used after a backoff sleep,
    /// which already satisfied the gap.
    pub fn record(&mut self) {
        self.last_request = Some(Instant::now());
    }
}

/// Rate-limited TonAPI jetton index client
#[derive(Debug)]
pub struct TonapiClient {
    config: TonapiConfig,
    http: Client,
    limiter: Mutex<RateLimiter>,
    credential: Mutex<Option<String>>,
}

impl TonapiClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_config(TonapiConfig::default())
    }

    /// Create a new client with a bearer credential
    pub fn with_api_key(api_key: String) -> Result<Self, LedgerError> {
        let mut config = TonapiConfig::default();
        config.api_key = Some(api_key);
        Self::with_config(config)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: TonapiConfig) -> Result<Self, LedgerError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LedgerError::Transport(format!("failed to create HTTP client: {}", e)))?;

        let gap = if config.api_key.is_some() {
            config.authenticated_gap
        } else {
            config.anonymous_gap
        };
        let credential = config.api_key.clone();

        Ok(Self {
            config,
            http,
            limiter: Mutex::new(RateLimiter::new(gap)),
            credential: Mutex::new(credential),
        })
    }

    /// Whether a credential is currently held
    pub async fn has_credential(&self) -> bool {
        self.credential.lock().await.is_some()
    }

    /// The gap currently enforced between requests
    pub async fn current_min_gap(&self) -> Duration {
        self.limiter.lock().await.min_gap()
    }

    /// Drop the credential and widen the throttle to the anonymous tier
    pub async fn demote(&self) {
        if self.credential.lock().await.take().is_some() {
            tracing::warn!("API credential rejected, dropping to anonymous tier");
        }
        self.limiter
            .lock()
            .await
            .set_min_gap(self.config.anonymous_gap);
    }

    /// Fetch a JSON document, driving the throttle / 429 / 401 state machine
    pub async fn get_json(&self, path: &str) -> Result<Value, LedgerError> {
        let url = format!("{}{}", self.config.base_url, path);

        let mut response = self.dispatch(&url).await?;
        let mut status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let header = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok());
            let delay = parse_retry_after(header, self.config.retry_fallback);
            tracing::warn!("rate limited (429), backing off for {:?}", delay);
            tokio::time::sleep(delay).await;
            // The backoff itself satisfied the gap; stamp and resend
            self.limiter.lock().await.record();
            response = self.send(&url).await?;
            status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(LedgerError::RateLimited);
            }
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            if !self.has_credential().await {
                return Err(LedgerError::Unauthorized);
            }
            self.demote().await;
            response = self.dispatch(&url).await?;
            status = response.status();
        }

        if !status.is_success() {
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => LedgerError::RateLimited,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LedgerError::Unauthorized,
                other => LedgerError::Status(other.as_u16()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| LedgerError::Decode(e.to_string()))
    }

    /// Throttled send
    async fn dispatch(&self, url: &str) -> Result<reqwest::Response, LedgerError> {
        self.limiter.lock().await.acquire().await;
        self.send(url).await
    }

    /// Raw send with the bearer header when a credential is held
    async fn send(&self, url: &str) -> Result<reqwest::Response, LedgerError> {
        let mut request = self.http.get(url);
        if let Some(key) = self.credential.lock().await.as_ref() {
            request = request.bearer_auth(key);
        }
        request
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

#[async_trait]
impl LedgerIndexPort for TonapiClient {
    async fn token_meta(&self, master: &str) -> Result<TokenMeta, LedgerError> {
        let doc = self.get_json(&format!("/jettons/{}", master)).await?;
        Ok(decode::token_meta(&doc))
    }

    async fn holders_page(
        &self,
        master: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<HolderRecord>, LedgerError> {
        let doc = self
            .get_json(&format!(
                "/jettons/{}/holders?limit={}&offset={}",
                master, limit, offset
            ))
            .await?;
        Ok(decode::holder_page(&doc))
    }
}

/// Resolve the server-advised retry delay, in whole seconds, falling back
/// to the configured default when the header is absent or unusable.
fn parse_retry_after(header: Option<&str>, fallback: Duration) -> Duration {
    header
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = TonapiConfig::default();
        assert_eq!(config.base_url, "https://tonapi.io/v2");
        assert!(config.api_key.is_none());
        assert_eq!(config.anonymous_gap, Duration::from_millis(4000));
        assert_eq!(config.authenticated_gap, Duration::from_millis(1000));
        assert_eq!(config.retry_fallback, Duration::from_secs(4));
    }

    #[test]
    fn test_client_creation() {
        let client = TonapiClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_anonymous_client_uses_wide_gap() {
        let client = TonapiClient::new().unwrap();
        assert!(!client.has_credential().await);
        assert_eq!(client.current_min_gap().await, Duration::from_millis(4000));
    }

    #[tokio::test]
    async fn test_credentialed_client_uses_narrow_gap() {
        let client = TonapiClient::with_api_key("secret".to_string()).unwrap();
        assert!(client.has_credential().await);
        assert_eq!(client.current_min_gap().await, Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_demotion_clears_credential_and_widens_gap() {
        let client = TonapiClient::with_api_key("expired".to_string()).unwrap();
        client.demote().await;
        assert!(!client.has_credential().await);
        assert_eq!(client.current_min_gap().await, Duration::from_millis(4000));
    }

    #[tokio::test]
    async fn test_demotion_is_idempotent() {
        let client = TonapiClient::new().unwrap();
        client.demote().await;
        client.demote().await;
        assert!(!client.has_credential().await);
        assert_eq!(client.current_min_gap().await, Duration::from_millis(4000));
    }

    #[test]
    fn test_parse_retry_after() {
        let fallback = Duration::from_secs(4);
        assert_eq!(parse_retry_after(Some("7"), fallback), Duration::from_secs(7));
        assert_eq!(parse_retry_after(Some(" 2 "), fallback), Duration::from_secs(2));
        assert_eq!(parse_retry_after(Some("0"), fallback), fallback);
        assert_eq!(parse_retry_after(Some("soon"), fallback), fallback);
        assert_eq!(parse_retry_after(None, fallback), fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_enforces_min_gap() {
        let mut limiter = RateLimiter::new(Duration::from_millis(4000));
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(1));
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_delays_second_call_by_remainder() {
        // Two requests 100ms apart in caller time: the second waits ~3900ms
        let mut limiter = RateLimiter::new(Duration::from_millis(4000));
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        let before = Instant::now();
        limiter.acquire().await;
        let waited = before.elapsed();
        assert!(waited >= Duration::from_millis(3900));
        assert!(waited < Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_no_wait_after_gap_elapsed() {
        let mut limiter = RateLimiter::new(Duration::from_millis(4000));
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_millis(5000)).await;
        let before = Instant::now();
        limiter.acquire().await;
        assert!(before.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_record_restarts_gap() {
        let mut limiter = RateLimiter::new(Duration::from_millis(1000));
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_millis(900)).await;
        limiter.record();
        let before = Instant::now();
        limiter.acquire().await;
        assert!(before.elapsed() >= Duration::from_millis(1000));
    }
}
