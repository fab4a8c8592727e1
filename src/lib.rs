#![allow(dead_code, unused_imports)]
//! gramwatch - Jetton Holder Concentration Analytics Library
//!
//! Ingests the holder list of a TON jetton master account from the
//! rate-limited TonAPI index and derives concentration analytics.
//!
//! # Modules
//!
//! - `domain`: Core logic (addresses, exact amount arithmetic, ranking, view ordering)
//! - `ports`: Trait abstractions (LedgerIndexPort, PriceFeedPort, CredentialStorePort)
//! - `adapters`: External implementations (TonAPI, CoinGecko, credential store, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Snapshot orchestration and view assembly

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
