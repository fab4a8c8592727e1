//! Credential Store Adapter
//!
//! JSON-file key-value store under the data directory. Holds the TonAPI
//! bearer credential between runs; a demoted key is removed so the next
//! run starts anonymous.

mod file_store;

pub use file_store::FileCredentialStore;
