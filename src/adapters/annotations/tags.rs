//! Address Tag Directory
//!
//! Loads the static tag annotation document and answers label lookups.
//! Entries may carry either address encoding; everything is normalized to
//! the raw lookup key on load, so a friendly-form tag still matches a
//! raw-form holder and vice versa.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TonAddress;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("failed to read tag document: {0}")]
    ReadError(String),

    #[error("failed to parse tag document: {0}")]
    ParseError(String),
}

/// One entry of the tag annotation document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagEntry {
    pub address: String,
    pub label: String,
}

/// Tag labels keyed by the canonical address form
#[derive(Debug, Clone, Default)]
pub struct TagDirectory {
    labels: HashMap<String, String>,
}

impl TagDirectory {
    /// Build the directory, normalizing every entry address. Entries whose
    /// address does not parse are dropped with a log line; one bad row must
    /// not lose the rest of the document.
    pub fn from_entries(entries: Vec<TagEntry>) -> Self {
        let mut labels = HashMap::new();
        for entry in entries {
            match TonAddress::parse(&entry.address) {
                Ok(addr) => {
                    labels.insert(addr.to_raw(), entry.label);
                }
                Err(e) => {
                    tracing::warn!("dropping tag for unparseable address {:?}: {}", entry.address, e);
                }
            }
        }
        Self { labels }
    }

    /// Load from a JSON file of `[{ "address": ..., "label": ... }]`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TagError> {
        let content =
            fs::read_to_string(path).map_err(|e| TagError::ReadError(e.to_string()))?;
        let entries: Vec<TagEntry> =
            serde_json::from_str(&content).map_err(|e| TagError::ParseError(e.to_string()))?;
        Ok(Self::from_entries(entries))
    }

    pub fn label_for(&self, address: &TonAddress) -> Option<&str> {
        self.labels.get(&address.to_raw()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "0:83dfd552e63729b472fcbcc44c3a42a879dec658f16a9476fe251d89a907b2e1";

    fn entry(address: &str, label: &str) -> TagEntry {
        TagEntry {
            address: address.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_lookup_by_raw_entry() {
        let dir = TagDirectory::from_entries(vec![entry(RAW, "exchange")]);
        let addr = TonAddress::parse(RAW).unwrap();
        assert_eq!(dir.label_for(&addr), Some("exchange"));
    }

    #[test]
    fn test_friendly_entry_matches_raw_holder() {
        let friendly = TonAddress::parse(RAW).unwrap().to_friendly();
        let dir = TagDirectory::from_entries(vec![entry(&friendly, "bridge")]);
        let addr = TonAddress::parse(RAW).unwrap();
        assert_eq!(dir.label_for(&addr), Some("bridge"));
    }

    #[test]
    fn test_unparseable_entries_are_dropped() {
        let dir = TagDirectory::from_entries(vec![
            entry("not-an-address", "junk"),
            entry(RAW, "kept"),
        ]);
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn test_missing_address_is_untagged() {
        let dir = TagDirectory::from_entries(vec![entry(RAW, "exchange")]);
        let other = TonAddress::new(0, [9u8; 32]);
        assert_eq!(dir.label_for(&other), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tags.json");
        std::fs::write(
            &path,
            format!(r#"[{{ "address": "{}", "label": "exchange" }}]"#, RAW),
        )
        .unwrap();

        let tags = TagDirectory::load(&path).unwrap();
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(TagDirectory::load("/nonexistent/tags.json").is_err());
    }
}
