use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use num_bigint::BigUint;

use crate::domain::{HolderRecord, TokenMeta};

use super::ledger::{LedgerError, LedgerIndexPort};
use super::price::{PriceError, PriceFeedPort};

/// Mock ledger index that serves configured pages and records calls
#[derive(Debug, Default)]
pub struct MockLedgerIndex {
    meta: Arc<Mutex<Option<TokenMeta>>>,
    pages: Arc<Mutex<Vec<Vec<HolderRecord>>>>,
    calls: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl MockLedgerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the metadata response
    pub fn with_meta(self, meta: TokenMeta) -> Self {
        *self.meta.lock().unwrap() = Some(meta);
        self
    }

    /// Builder method to append one holder page, served in order
    pub fn with_page(self, page: Vec<HolderRecord>) -> Self {
        self.pages.lock().unwrap().push(page);
        self
    }

    /// Get all recorded (limit, offset) holder-page calls
    pub fn page_calls(&self) -> Vec<(u32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerIndexPort for MockLedgerIndex {
    async fn token_meta(&self, _master: &str) -> Result<TokenMeta, LedgerError> {
        self.meta
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| LedgerError::Decode("no metadata configured".into()))
    }

    async fn holders_page(
        &self,
        _master: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<HolderRecord>, LedgerError> {
        self.calls.lock().unwrap().push((limit, offset));
        let mut pages = self.pages.lock().unwrap();
        if pages.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(pages.remove(0))
        }
    }
}

/// Mock price feed with a fixed response
#[derive(Debug, Default)]
pub struct MockPriceFeed {
    price: Option<f64>,
    calls: Arc<Mutex<u32>>,
}

impl MockPriceFeed {
    pub fn new(price: Option<f64>) -> Self {
        Self {
            price,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl PriceFeedPort for MockPriceFeed {
    async fn usd_price(&self) -> Result<Option<f64>, PriceError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.price)
    }
}

/// Fixture: metadata for a 9-decimal token with the given supply
pub fn meta_fixture(total_supply: u64) -> TokenMeta {
    TokenMeta {
        name: "Gram".to_string(),
        symbol: "GRAM".to_string(),
        decimals: 9,
        total_supply: BigUint::from(total_supply),
    }
}
