//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - The jetton ledger index (metadata, holder pages)
//! - The fiat price feed
//! - The credential key-value store

pub mod credentials;
pub mod ledger;
pub mod mocks;
pub mod price;

pub use credentials::{CredentialError, CredentialStorePort, API_KEY_STORAGE_KEY};
pub use ledger::{LedgerError, LedgerIndexPort};
pub use price::{PriceError, PriceFeedPort};
