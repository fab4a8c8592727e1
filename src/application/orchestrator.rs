//! Holder Analytics Orchestrator
//!
//! Coordinates the ingestion client with the aggregation and view layers:
//! fetch metadata, page through the holder list up to the snapshot cap,
//! rank, derive concentration, and assemble sorted/paginated views for the
//! presentation boundary.

use thiserror::Error;

use crate::adapters::annotations::TagDirectory;
use crate::domain::{
    aggregator, sort_paginator, ConcentrationStats, HolderRecord, HolderRow, SortDirection,
    SortField, TokenMeta, TonAddress,
};
use crate::ports::ledger::{LedgerError, LedgerIndexPort};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Snapshot ingestion limits
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Holders requested per page
    pub page_limit: u32,
    /// Ingestion cap for one snapshot; 1000 covers the largest
    /// concentration prefix
    pub max_holders: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            page_limit: 100,
            max_holders: 1000,
        }
    }
}

/// A ranked holder snapshot with derived concentration sums.
/// Recomputed on every fetch, never persisted.
#[derive(Debug, Clone)]
pub struct HolderSnapshot {
    pub meta: TokenMeta,
    pub holders: Vec<HolderRecord>,
    pub stats: ConcentrationStats,
}

impl HolderSnapshot {
    /// Join holders with their tag labels into view rows
    pub fn rows(&self, tags: &TagDirectory) -> Vec<HolderRow> {
        self.holders
            .iter()
            .map(|record| HolderRow {
                record: record.clone(),
                tag: tags.label_for(&record.address).map(String::from),
            })
            .collect()
    }

    /// A holder's share of total supply for display
    pub fn share_of(&self, record: &HolderRecord) -> String {
        aggregator::share_of_supply(&record.balance, &self.meta.total_supply)
    }
}

/// View parameters for one `holders` page render
#[derive(Debug, Clone)]
pub struct ViewQuery {
    pub field: SortField,
    pub direction: SortDirection,
    pub search: Option<String>,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            field: SortField::Rank,
            direction: SortDirection::Ascending,
            search: None,
            page_index: 0,
            page_size: 50,
        }
    }
}

/// One page of the holder view
#[derive(Debug, Clone)]
pub struct HolderPage {
    pub rows: Vec<HolderRow>,
    pub page_index: usize,
    pub total_pages: usize,
}

/// Snapshot fetch and view assembly over any ledger index implementation
pub struct HolderAnalytics<L> {
    ledger: L,
    master: String,
    config: SnapshotConfig,
}

impl<L: LedgerIndexPort> HolderAnalytics<L> {
    pub fn new(ledger: L, master: impl Into<String>) -> Self {
        Self::with_config(ledger, master, SnapshotConfig::default())
    }

    pub fn with_config(ledger: L, master: impl Into<String>, config: SnapshotConfig) -> Self {
        Self {
            ledger,
            master: master.into(),
            config,
        }
    }

    /// Fetch the issuer metadata alone
    pub async fn token_meta(&self) -> Result<TokenMeta, SnapshotError> {
        Ok(self.ledger.token_meta(&self.master).await?)
    }

    /// Fetch a full snapshot: metadata, then holder pages until a short
    /// page or the ingestion cap, then rank and derive concentration.
    pub async fn fetch_snapshot(&self) -> Result<HolderSnapshot, SnapshotError> {
        let meta = self.ledger.token_meta(&self.master).await?;

        let limit = self.config.page_limit.max(1);
        let cap = self.config.max_holders as usize;
        let mut records: Vec<HolderRecord> = Vec::new();
        let mut offset = 0u32;

        loop {
            let page = self.ledger.holders_page(&self.master, limit, offset).await?;
            let short_page = (page.len() as u32) < limit;
            records.extend(page);

            if short_page || records.len() >= cap {
                break;
            }
            offset += limit;
        }
        records.truncate(cap);

        tracing::info!(
            "snapshot ingested {} holders for {}",
            records.len(),
            self.master
        );

        let holders = aggregator::rank(records);
        let stats = aggregator::concentration(&holders);

        Ok(HolderSnapshot {
            meta,
            holders,
            stats,
        })
    }

    pub fn master(&self) -> &str {
        &self.master
    }

    /// The underlying ledger adapter, for post-run state checks
    pub fn ledger(&self) -> &L {
        &self.ledger
    }
}

/// Assemble one view page: tag join, search filter, sort, paginate.
pub fn build_view(
    snapshot: &HolderSnapshot,
    tags: &TagDirectory,
    query: &ViewQuery,
) -> HolderPage {
    let mut rows = snapshot.rows(tags);

    if let Some(needle) = query.search.as_deref() {
        let needle = needle.trim().to_lowercase();
        if !needle.is_empty() {
            rows.retain(|row| matches_search(&row.record.address, &needle));
        }
    }

    sort_paginator::sort_by(
        &mut rows,
        query.field,
        query.direction,
        &snapshot.meta.total_supply,
    );

    let (slice, total_pages) = sort_paginator::paginate(&rows, query.page_index, query.page_size);
    HolderPage {
        rows: slice.to_vec(),
        page_index: query.page_index,
        total_pages,
    }
}

/// Substring match against either encoding, case-insensitive
fn matches_search(address: &TonAddress, lowercase_needle: &str) -> bool {
    address.to_raw().contains(lowercase_needle)
        || address
            .to_friendly()
            .to_lowercase()
            .contains(lowercase_needle)
}
