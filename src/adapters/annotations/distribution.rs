//! Precomputed Distribution Buckets
//!
//! The balance-distribution report is produced out-of-band and shipped as a
//! static JSON document. It arrives already shaped; this module only
//! deserializes it for rendering.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::tags::TagError;

/// One row of the distribution report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionBucket {
    /// Human-readable balance range, e.g. "1M - 10M"
    pub range: String,
    /// Number of holders in the bucket
    pub holders: u64,
    /// Combined balance of the bucket, raw integer units as a string
    pub total: String,
}

/// Load the report from a JSON file of bucket rows
pub fn load_distribution<P: AsRef<Path>>(path: P) -> Result<Vec<DistributionBucket>, TagError> {
    let content = fs::read_to_string(path).map_err(|e| TagError::ReadError(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| TagError::ParseError(e.to_string()))
}
