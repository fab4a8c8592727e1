//! Permissive Response Decoding
//!
//! TonAPI payload shapes drift between versions: the metadata object, the
//! holder list, the address and the balance each appear under several
//! possible keys. All of that tolerance lives here, applied once at the
//! decode boundary; the rest of the system only sees the canonical
//! `TokenMeta` / `HolderRecord` shapes.
//!
//! Missing fields get safe defaults (decimals 9, balance 0, delta 0)
//! instead of failing the page. A record whose address cannot be resolved
//! or parsed is skipped, since nothing downstream could key it.

use num_bigint::{BigInt, BigUint};
use serde_json::Value;

use crate::domain::{HolderRecord, TokenMeta, TonAddress};

/// Standard jetton scale, used when the metadata omits `decimals`
pub const DEFAULT_DECIMALS: u32 = 9;

const METADATA_KEYS: [&str; 2] = ["metadata", "jetton"];
const SUPPLY_KEYS: [&str; 2] = ["total_supply", "totalSupply"];
const LIST_KEYS: [&str; 3] = ["holders", "addresses", "items"];
const BALANCE_KEYS: [&str; 3] = ["balance", "amount", "jetton_balance"];
const CHANGE_KEYS: [&str; 3] = ["balance_change_24h", "balanceChange24h", "change_24h"];

/// Decode the issuer metadata response.
pub fn token_meta(doc: &Value) -> TokenMeta {
    let meta = METADATA_KEYS
        .iter()
        .find_map(|key| doc.get(key))
        .filter(|v| v.is_object())
        .unwrap_or(doc);

    let decimals = meta
        .get("decimals")
        .and_then(as_u32)
        .unwrap_or(DEFAULT_DECIMALS);

    let total_supply = first_of(meta, &SUPPLY_KEYS)
        .or_else(|| first_of(doc, &SUPPLY_KEYS))
        .and_then(as_biguint)
        .unwrap_or_default();

    TokenMeta {
        name: string_field(meta, "name").unwrap_or_else(|| "UNKNOWN".to_string()),
        symbol: string_field(meta, "symbol").unwrap_or_else(|| "UNKNOWN".to_string()),
        decimals,
        total_supply,
    }
}

/// Decode one page of the holders response into unranked records.
pub fn holder_page(doc: &Value) -> Vec<HolderRecord> {
    let list = LIST_KEYS
        .iter()
        .find_map(|key| doc.get(key).and_then(Value::as_array))
        .or_else(|| doc.as_array());

    let Some(items) = list else {
        tracing::debug!("holders response carried no recognizable list");
        return Vec::new();
    };

    items.iter().filter_map(holder_record).collect()
}

fn holder_record(item: &Value) -> Option<HolderRecord> {
    let raw = resolve_address(item)?;
    let address = match TonAddress::parse(raw) {
        Ok(addr) => addr,
        Err(e) => {
            tracing::debug!("skipping holder with unparseable address {:?}: {}", raw, e);
            return None;
        }
    };

    let balance = first_of(item, &BALANCE_KEYS)
        .and_then(as_biguint)
        .unwrap_or_default();
    let balance_change_24h = first_of(item, &CHANGE_KEYS)
        .and_then(as_bigint)
        .unwrap_or_default();

    Some(HolderRecord {
        address,
        balance,
        balance_change_24h,
        rank: 0,
    })
}

fn resolve_address(item: &Value) -> Option<&str> {
    item.pointer("/owner/address")
        .and_then(Value::as_str)
        .or_else(|| item.get("address").and_then(Value::as_str))
        .or_else(|| item.pointer("/account/address").and_then(Value::as_str))
        .or_else(|| item.get("wallet_address").and_then(Value::as_str))
}

fn first_of<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| value.get(key))
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.is_empty())
}

/// Integer-like JSON value (number or numeric string) as u32
fn as_u32(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Integer-like JSON value as an unsigned big integer
fn as_biguint(value: &Value) -> Option<BigUint> {
    value
        .as_u64()
        .map(BigUint::from)
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Integer-like JSON value as a signed big integer
fn as_bigint(value: &Value) -> Option<BigInt> {
    value
        .as_i64()
        .map(BigInt::from)
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}
