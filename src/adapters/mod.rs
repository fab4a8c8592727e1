//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - TonAPI: rate-limited jetton index client and decode boundary
//! - Market Data: CoinGecko fiat price feed
//! - Credentials: file-backed key-value store for the bearer credential
//! - Annotations: static tag and distribution documents
//! - CLI: command-line argument definitions

pub mod annotations;
pub mod cli;
pub mod credentials;
pub mod market_data;
pub mod tonapi;

pub use annotations::TagDirectory;
pub use cli::CliApp;
pub use credentials::FileCredentialStore;
pub use market_data::{CoingeckoClient, PricePoller};
pub use tonapi::{TonapiClient, TonapiConfig};
