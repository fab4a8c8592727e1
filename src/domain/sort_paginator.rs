//! Holder View Ordering and Paging
//!
//! Orders an in-memory holder collection by a chosen field and slices it
//! into fixed-size pages. Numeric fields compare as exact integers; the
//! share field compares the derived scaled ratio, never the rounded display
//! string. Direction is an explicit parameter on every call; toggling on
//! repeated selection is the presentation layer's business.

use std::cmp::Ordering;

use num_bigint::BigUint;
use serde::Serialize;

use super::model::HolderRecord;
use super::scaled_amount;

/// A holder joined with its optional tag label, ready for view ordering.
#[derive(Debug, Clone, Serialize)]
pub struct HolderRow {
    pub record: HolderRecord,
    pub tag: Option<String>,
}

impl HolderRow {
    pub fn untagged(record: HolderRecord) -> Self {
        Self { record, tag: None }
    }

    fn tag_label(&self) -> &str {
        self.tag.as_deref().unwrap_or("")
    }
}

/// Sortable view fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Rank,
    Address,
    Tag,
    Balance,
    Change24h,
    Share,
}

impl SortField {
    /// Parse the CLI spelling of a field name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rank" => Some(Self::Rank),
            "address" => Some(Self::Address),
            "tag" => Some(Self::Tag),
            "balance" => Some(Self::Balance),
            "change" | "change24h" => Some(Self::Change24h),
            "share" | "percent" => Some(Self::Share),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// Stable in-place sort by the chosen field.
///
/// `total_supply` feeds the share comparator; with a zero supply every share
/// is unavailable and the ordering is a no-op (stability preserves input
/// order).
pub fn sort_by(
    rows: &mut [HolderRow],
    field: SortField,
    direction: SortDirection,
    total_supply: &BigUint,
) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, field, total_supply);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare(a: &HolderRow, b: &HolderRow, field: SortField, total_supply: &BigUint) -> Ordering {
    match field {
        SortField::Rank => a.record.rank.cmp(&b.record.rank),
        SortField::Address => a.record.address.to_raw().cmp(&b.record.address.to_raw()),
        SortField::Tag => a.tag_label().cmp(b.tag_label()),
        SortField::Balance => a.record.balance.cmp(&b.record.balance),
        SortField::Change24h => a
            .record
            .balance_change_24h
            .cmp(&b.record.balance_change_24h),
        SortField::Share => {
            let ra = scaled_amount::percent_ratio(&a.record.balance, total_supply);
            let rb = scaled_amount::percent_ratio(&b.record.balance, total_supply);
            ra.cmp(&rb)
        }
    }
}

/// Slice a collection into a fixed-size page.
///
/// Returns the page contents and the total page count. An out-of-range
/// `page_index` yields an empty slice rather than an error; a zero
/// `page_size` yields an empty slice and zero pages.
pub fn paginate<T>(items: &[T], page_index: usize, page_size: usize) -> (&[T], usize) {
    if page_size == 0 {
        return (&[], 0);
    }
    let total_pages = items.len().div_ceil(page_size);
    let start = page_index.saturating_mul(page_size);
    if start >= items.len() {
        return (&[], total_pages);
    }
    let end = (start + page_size).min(items.len());
    (&items[start..end], total_pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::address::TonAddress;
    use num_bigint::BigInt;

    fn row(seed: u8, balance: u64, change: i64, tag: Option<&str>) -> HolderRow {
        let mut hash = [0u8; 32];
        hash[0] = seed;
        let mut record = HolderRecord::new(TonAddress::new(0, hash), BigUint::from(balance));
        record.balance_change_24h = BigInt::from(change);
        record.rank = seed as u32;
        HolderRow {
            record,
            tag: tag.map(String::from),
        }
    }

    fn seeds(rows: &[HolderRow]) -> Vec<u8> {
        rows.iter().map(|r| r.record.address.hash()[0]).collect()
    }

    #[test]
    fn test_sort_by_balance_descending() {
        let mut rows = vec![
            row(1, 50, 0, None),
            row(2, 200, 0, None),
            row(3, 100, 0, None),
        ];
        sort_by(
            &mut rows,
            SortField::Balance,
            SortDirection::Descending,
            &BigUint::from(350u32),
        );
        assert_eq!(seeds(&rows), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_rank_ascending() {
        let mut rows = vec![row(3, 0, 0, None), row(1, 0, 0, None), row(2, 0, 0, None)];
        sort_by(
            &mut rows,
            SortField::Rank,
            SortDirection::Ascending,
            &BigUint::from(1u8),
        );
        assert_eq!(seeds(&rows), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_by_address_lexicographic() {
        let mut rows = vec![row(9, 0, 0, None), row(1, 0, 0, None), row(4, 0, 0, None)];
        sort_by(
            &mut rows,
            SortField::Address,
            SortDirection::Ascending,
            &BigUint::from(1u8),
        );
        assert_eq!(seeds(&rows), vec![1, 4, 9]);
    }

    #[test]
    fn test_sort_by_tag_with_empty_default() {
        let mut rows = vec![
            row(1, 0, 0, Some("exchange")),
            row(2, 0, 0, None),
            row(3, 0, 0, Some("bridge")),
        ];
        sort_by(
            &mut rows,
            SortField::Tag,
            SortDirection::Ascending,
            &BigUint::from(1u8),
        );
        // Untagged sorts as "" ahead of every label
        assert_eq!(seeds(&rows), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_change_signed() {
        let mut rows = vec![
            row(1, 0, -5, None),
            row(2, 0, 10, None),
            row(3, 0, 0, None),
        ];
        sort_by(
            &mut rows,
            SortField::Change24h,
            SortDirection::Descending,
            &BigUint::from(1u8),
        );
        assert_eq!(seeds(&rows), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_share_uses_exact_ratio() {
        let total = BigUint::from(100u8);
        let mut rows = vec![
            row(1, 1, 0, None),  // 1.000%
            row(2, 30, 0, None), // 30.000%
            row(3, 9, 0, None),  // 9.000%
        ];
        // Comparing display strings would put "9.000%" ahead of "30.000%";
        // the scaled integer ratio orders them numerically
        sort_by(&mut rows, SortField::Share, SortDirection::Descending, &total);
        assert_eq!(seeds(&rows), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_share_zero_supply_is_stable() {
        let mut rows = vec![row(1, 5, 0, None), row(2, 9, 0, None), row(3, 1, 0, None)];
        sort_by(
            &mut rows,
            SortField::Share,
            SortDirection::Descending,
            &BigUint::from(0u8),
        );
        assert_eq!(seeds(&rows), vec![1, 2, 3]);
    }

    #[test]
    fn test_direction_is_explicit_per_call() {
        let mut rows = vec![row(1, 1, 0, None), row(2, 2, 0, None)];
        let total = BigUint::from(3u8);
        sort_by(&mut rows, SortField::Balance, SortDirection::Ascending, &total);
        assert_eq!(seeds(&rows), vec![1, 2]);
        // Same field again with the same direction: no hidden toggle
        sort_by(&mut rows, SortField::Balance, SortDirection::Ascending, &total);
        assert_eq!(seeds(&rows), vec![1, 2]);
    }

    #[test]
    fn test_paginate_basic() {
        let items: Vec<u32> = (0..10).collect();
        let (page, total) = paginate(&items, 0, 3);
        assert_eq!(page, &[0, 1, 2]);
        assert_eq!(total, 4);

        let (page, _) = paginate(&items, 3, 3);
        assert_eq!(page, &[9]);
    }

    #[test]
    fn test_paginate_out_of_range_is_empty() {
        let items: Vec<u32> = (0..1000).collect();
        let (page, total) = paginate(&items, 50, 20);
        assert!(page.is_empty());
        assert_eq!(total, 50);
    }

    #[test]
    fn test_paginate_zero_size() {
        let items = [1, 2, 3];
        let (page, total) = paginate(&items, 0, 0);
        assert!(page.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_paginate_empty_collection() {
        let items: [u32; 0] = [];
        let (page, total) = paginate(&items, 0, 20);
        assert!(page.is_empty());
        assert_eq!(total, 0);
    }
}
