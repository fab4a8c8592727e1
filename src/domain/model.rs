//! Canonical Ledger Shapes
//!
//! The decode boundary in `adapters::tonapi` resolves the indexer's
//! duck-typed payloads into exactly these types; everything downstream
//! (aggregation, sorting, display) consumes them and nothing else.

use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};

use super::address::TonAddress;

/// Jetton metadata, created once per session from the master account
/// response and immutable afterward. `decimals` defines the scale used by
/// every amount conversion for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMeta {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub total_supply: BigUint,
}

/// One holder of the jetton.
///
/// `balance` and `balance_change_24h` are raw integer ledger units; supplies
/// can exceed 2^53 so they are never held as floats. `rank` is 0 as decoded
/// and becomes a 1-based position once `aggregator::rank` has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderRecord {
    pub address: TonAddress,
    pub balance: BigUint,
    pub balance_change_24h: BigInt,
    #[serde(default)]
    pub rank: u32,
}

impl HolderRecord {
    pub fn new(address: TonAddress, balance: BigUint) -> Self {
        Self {
            address,
            balance,
            balance_change_24h: BigInt::from(0),
            rank: 0,
        }
    }
}

/// Sums of the largest holder prefixes, recomputed on every full snapshot
/// and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentrationStats {
    pub top10: BigUint,
    pub top100: BigUint,
    pub top1000: BigUint,
}
