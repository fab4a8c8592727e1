//! Price Feed Port
//!
//! Abstraction over the fiat market-data source. A missing quote is a
//! normal outcome (`Ok(None)`, rendered as "price unavailable"), not an
//! error; errors are reserved for transport and shape faults.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("price API error: {0}")]
    ApiError(String),

    #[error("price response parse error: {0}")]
    ParseError(String),
}

#[async_trait]
pub trait PriceFeedPort: Send + Sync {
    /// Current USD price for the configured coin id, if the source has one.
    async fn usd_price(&self) -> Result<Option<f64>, PriceError>;
}
