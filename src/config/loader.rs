//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config/default.toml.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::adapters::market_data::CoingeckoConfig;
use crate::adapters::tonapi::TonapiConfig;
use crate::application::SnapshotConfig;
use crate::domain::TonAddress;

/// Main configuration structure matching the TOML layout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub tonapi: TonapiSection,
    pub price: PriceSection,
    #[serde(default)]
    pub annotations: AnnotationsSection,
    pub storage: StorageSection,
    pub logging: LoggingSection,
}

/// TonAPI ingestion section
#[derive(Debug, Clone, Deserialize)]
pub struct TonapiSection {
    /// TonAPI v2 base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Jetton master account, raw or friendly form
    pub master: String,
    /// Optional bearer credential for the faster tier
    #[serde(default)]
    pub api_key: Option<String>,
    /// Holders requested per page
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    /// Ingestion cap for one snapshot
    #[serde(default = "default_max_snapshot_holders")]
    pub max_snapshot_holders: u32,
    /// Minimum request gap without a credential (ms)
    #[serde(default = "default_anonymous_gap_ms")]
    pub anonymous_gap_ms: u64,
    /// Minimum request gap with a credential (ms)
    #[serde(default = "default_authenticated_gap_ms")]
    pub authenticated_gap_ms: u64,
    /// 429 backoff when no retry-after header arrives (s)
    #[serde(default = "default_retry_fallback_secs")]
    pub retry_fallback_secs: u64,
    /// Request timeout (s)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Price feed section
#[derive(Debug, Clone, Deserialize)]
pub struct PriceSection {
    /// CoinGecko coin id
    pub coin_id: String,
    /// Quote currency
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    /// Poll cadence (s)
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

/// Static annotation documents (optional)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AnnotationsSection {
    /// Path to the tag annotation JSON
    #[serde(default)]
    pub tags_path: Option<String>,
    /// Path to the precomputed distribution report JSON
    #[serde(default)]
    pub distribution_path: Option<String>,
}

/// Local storage section
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    /// Data directory for the credential store
    pub data_dir: String,
}

/// Logging section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

fn default_base_url() -> String {
    "https://tonapi.io/v2".to_string()
}

fn default_page_limit() -> u32 {
    100
}

fn default_max_snapshot_holders() -> u32 {
    1000
}

fn default_anonymous_gap_ms() -> u64 {
    4000
}

fn default_authenticated_gap_ms() -> u64 {
    1000
}

fn default_retry_fallback_secs() -> u64 {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_poll_interval_secs() -> u64 {
    60
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tonapi.master.is_empty() {
            return Err(ConfigError::ValidationError(
                "master cannot be empty".to_string(),
            ));
        }

        if TonAddress::parse(&self.tonapi.master).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "master is not a TON address: {}",
                self.tonapi.master
            )));
        }

        if self.tonapi.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "base_url cannot be empty".to_string(),
            ));
        }

        if self.tonapi.page_limit == 0 {
            return Err(ConfigError::ValidationError(format!(
                "page_limit must be > 0, got {}",
                self.tonapi.page_limit
            )));
        }

        if self.tonapi.max_snapshot_holders == 0 {
            return Err(ConfigError::ValidationError(format!(
                "max_snapshot_holders must be > 0, got {}",
                self.tonapi.max_snapshot_holders
            )));
        }

        if self.tonapi.anonymous_gap_ms == 0 || self.tonapi.authenticated_gap_ms == 0 {
            return Err(ConfigError::ValidationError(
                "request gaps must be > 0".to_string(),
            ));
        }

        if self.tonapi.authenticated_gap_ms > self.tonapi.anonymous_gap_ms {
            return Err(ConfigError::ValidationError(format!(
                "authenticated_gap_ms ({}) cannot exceed anonymous_gap_ms ({})",
                self.tonapi.authenticated_gap_ms, self.tonapi.anonymous_gap_ms
            )));
        }

        if self.price.coin_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "coin_id cannot be empty".to_string(),
            ));
        }

        if self.price.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "poll_interval_secs must be > 0, got {}",
                self.price.poll_interval_secs
            )));
        }

        if self.storage.data_dir.is_empty() {
            return Err(ConfigError::ValidationError(
                "data_dir cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Data directory with `~` expanded
    pub fn data_dir(&self) -> String {
        shellexpand::tilde(&self.storage.data_dir).to_string()
    }
}

impl TonapiSection {
    /// Get API key with environment variable fallback
    /// Checks TONAPI_KEY env var if the config value is empty/None
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("TONAPI_KEY").ok().filter(|k| !k.is_empty())
    }

    /// Build the client configuration with the resolved credential
    pub fn client_config(&self, api_key: Option<String>) -> TonapiConfig {
        TonapiConfig {
            base_url: self.base_url.clone(),
            api_key,
            timeout: Duration::from_secs(self.timeout_secs),
            anonymous_gap: Duration::from_millis(self.anonymous_gap_ms),
            authenticated_gap: Duration::from_millis(self.authenticated_gap_ms),
            retry_fallback: Duration::from_secs(self.retry_fallback_secs),
        }
    }

    /// Build the snapshot ingestion limits
    pub fn snapshot_config(&self) -> SnapshotConfig {
        SnapshotConfig {
            page_limit: self.page_limit,
            max_holders: self.max_snapshot_holders,
        }
    }
}

impl From<&PriceSection> for CoingeckoConfig {
    fn from(section: &PriceSection) -> Self {
        CoingeckoConfig {
            coin_id: section.coin_id.clone(),
            vs_currency: section.vs_currency.clone(),
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(section.poll_interval_secs),
        }
    }
}
