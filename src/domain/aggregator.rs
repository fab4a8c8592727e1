//! Holder Ranking and Concentration
//!
//! Ranks decoded holder records by balance and derives the top-K
//! concentration sums. Comparisons are exact `BigUint` ordering; numeric
//! coercion would silently collapse balances above 2^53.

use num_bigint::BigUint;

use super::model::{ConcentrationStats, HolderRecord};
use super::scaled_amount;

/// Prefix lengths captured by [`concentration`].
const TOP_PREFIXES: [usize; 3] = [10, 100, 1000];

/// Stable sort by balance descending, then assign 1-based ranks.
///
/// Records with equal balances keep their input order, so a re-ranking of
/// an already ranked snapshot is a no-op on positions.
pub fn rank(mut records: Vec<HolderRecord>) -> Vec<HolderRecord> {
    records.sort_by(|a, b| b.balance.cmp(&a.balance));
    for (i, record) in records.iter_mut().enumerate() {
        record.rank = (i + 1) as u32;
    }
    records
}

/// Exact running sums over the top 10 / 100 / 1000 prefixes of a ranked
/// sequence, clamped to the available length.
pub fn concentration(ranked: &[HolderRecord]) -> ConcentrationStats {
    let mut sums = [BigUint::from(0u8), BigUint::from(0u8), BigUint::from(0u8)];
    let mut running = BigUint::from(0u8);

    for (i, record) in ranked.iter().enumerate() {
        running += &record.balance;
        for (slot, &len) in TOP_PREFIXES.iter().enumerate() {
            if i + 1 == len {
                sums[slot] = running.clone();
            }
        }
    }
    // Shorter snapshots: every prefix past the end is the whole sum
    for (slot, &len) in TOP_PREFIXES.iter().enumerate() {
        if ranked.len() < len {
            sums[slot] = running.clone();
        }
    }

    let [top10, top100, top1000] = sums;
    ConcentrationStats { top10, top100, top1000 }
}

/// A holder's share of total supply as a fixed-digit percentage string.
/// Zero supply yields the unavailable sentinel for every holder.
pub fn share_of_supply(balance: &BigUint, total_supply: &BigUint) -> String {
    scaled_amount::percent_of(balance, total_supply)
}
