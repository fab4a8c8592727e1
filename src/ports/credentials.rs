//! Credential Store Port
//!
//! Opaque key-value store holding the bearer credential for the ledger
//! index API. The core only ever reads and writes one fixed key.

use thiserror::Error;

/// Storage key for the TonAPI bearer credential.
pub const API_KEY_STORAGE_KEY: &str = "tonapi_key";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to read credential store: {0}")]
    ReadError(String),

    #[error("failed to write credential store: {0}")]
    WriteError(String),
}

pub trait CredentialStorePort: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError>;

    /// Store a value under `key`; `None` removes it.
    fn set(&self, key: &str, value: Option<&str>) -> Result<(), CredentialError>;
}
