//! Ledger Index Port
//!
//! Trait abstraction over the jetton indexing API. The adapter owns the
//! throttle and retry behavior; callers only see decoded canonical shapes
//! or a typed error from the taxonomy below.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{HolderRecord, TokenMeta};

/// Errors surfaced by a ledger index adapter.
///
/// `RateLimited` and `Unauthorized` are terminal only after the adapter has
/// spent its single bounded retry for that class; anything else was never
/// retried.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("rate limited after retry")]
    RateLimited,

    #[error("request not authorized")]
    Unauthorized,

    #[error("ledger API returned status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response shape: {0}")]
    Decode(String),
}

/// Read access to the jetton ledger index.
#[async_trait]
pub trait LedgerIndexPort: Send + Sync {
    /// Fetch the issuer metadata for a jetton master account.
    async fn token_meta(&self, master: &str) -> Result<TokenMeta, LedgerError>;

    /// Fetch one page of holder records, already decoded and unranked.
    async fn holders_page(
        &self,
        master: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<HolderRecord>, LedgerError>;
}
