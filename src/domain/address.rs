//! TON Account Addresses
//!
//! A TON account has two equivalent textual encodings:
//! - raw: `workchain:hex64` (e.g. `0:83df...b2e1`), the canonical internal form
//! - friendly: 48 base64 characters wrapping a tag byte, the workchain, the
//!   32-byte account id and a CRC16 checksum
//!
//! Both encodings must resolve to the same account identity. Every lookup
//! (tag matching, search) keys on the raw form produced by [`TonAddress::to_raw`].

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag byte for a bounceable friendly address
const TAG_BOUNCEABLE: u8 = 0x11;
/// Tag byte for a non-bounceable friendly address
const TAG_NON_BOUNCEABLE: u8 = 0x51;
/// Bit set on the tag byte for testnet-only addresses
const FLAG_TEST_ONLY: u8 = 0x80;

/// Friendly form is 1 tag + 1 workchain + 32 hash + 2 checksum bytes
const FRIENDLY_LEN: usize = 36;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("not a raw or friendly TON address: {0}")]
    Malformed(String),

    #[error("unsupported workchain: {0}")]
    BadWorkchain(i64),

    #[error("checksum mismatch in friendly address")]
    BadChecksum,

    #[error("unknown address tag byte: {0:#04x}")]
    BadTag(u8),
}

/// A parsed TON account identity.
///
/// Equality and hashing go through the (workchain, hash) pair, so the two
/// textual encodings of one account compare equal after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TonAddress {
    workchain: i8,
    hash: [u8; 32],
}

impl TonAddress {
    pub fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    /// Parse either encoding. Raw is tried first, then friendly.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let s = input.trim();
        if s.contains(':') {
            Self::parse_raw(s)
        } else {
            Self::parse_friendly(s)
        }
    }

    /// Parse the raw `workchain:hex64` form.
    fn parse_raw(s: &str) -> Result<Self, AddressError> {
        let (wc_part, hash_part) = s
            .split_once(':')
            .ok_or_else(|| AddressError::Malformed(s.to_string()))?;

        let wc: i64 = wc_part
            .parse()
            .map_err(|_| AddressError::Malformed(s.to_string()))?;
        let workchain =
            i8::try_from(wc).map_err(|_| AddressError::BadWorkchain(wc))?;

        let bytes = hex::decode(hash_part)
            .map_err(|_| AddressError::Malformed(s.to_string()))?;
        let hash: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AddressError::Malformed(s.to_string()))?;

        Ok(Self { workchain, hash })
    }

    /// Parse the friendly base64 form. Accepts both the URL-safe and the
    /// standard alphabet, bounceable and non-bounceable tags, and the
    /// testnet flag; the checksum is always verified.
    fn parse_friendly(s: &str) -> Result<Self, AddressError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .or_else(|_| STANDARD_NO_PAD.decode(s))
            .map_err(|_| AddressError::Malformed(s.to_string()))?;

        if bytes.len() != FRIENDLY_LEN {
            return Err(AddressError::Malformed(s.to_string()));
        }

        let expected = crc16(&bytes[..34]);
        let actual = u16::from_be_bytes([bytes[34], bytes[35]]);
        if expected != actual {
            return Err(AddressError::BadChecksum);
        }

        let tag = bytes[0] & !FLAG_TEST_ONLY;
        if tag != TAG_BOUNCEABLE && tag != TAG_NON_BOUNCEABLE {
            return Err(AddressError::BadTag(bytes[0]));
        }

        let workchain = bytes[1] as i8;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[2..34]);

        Ok(Self { workchain, hash })
    }

    /// Canonical raw form, also the lookup key: `workchain:hex64` lowercase.
    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    /// Display form: non-bounceable, URL-safe, mainnet.
    pub fn to_friendly(&self) -> String {
        let mut bytes = [0u8; FRIENDLY_LEN];
        bytes[0] = TAG_NON_BOUNCEABLE;
        bytes[1] = self.workchain as u8;
        bytes[2..34].copy_from_slice(&self.hash);
        let crc = crc16(&bytes[..34]);
        bytes[34..36].copy_from_slice(&crc.to_be_bytes());
        URL_SAFE_NO_PAD.encode(bytes)
    }

    pub fn workchain(&self) -> i8 {
        self.workchain
    }

    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }
}

impl fmt::Display for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_friendly())
    }
}

impl FromStr for TonAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<TonAddress> for String {
    fn from(addr: TonAddress) -> Self {
        addr.to_raw()
    }
}

impl TryFrom<String> for TonAddress {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

/// CRC16/XMODEM (poly 0x1021, init 0), the checksum used by friendly addresses.
fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "0:83dfd552e63729b472fcbcc44c3a42a879dec658f16a9476fe251d89a907b2e1";

    #[test]
    fn test_crc16_xmodem_check_value() {
        // Standard CRC-16/XMODEM check input
        assert_eq!(crc16(b"123456789"), 0x31c3);
    }

    #[test]
    fn test_parse_raw() {
        let addr = TonAddress::parse(RAW).unwrap();
        assert_eq!(addr.workchain(), 0);
        assert_eq!(addr.to_raw(), RAW);
    }

    #[test]
    fn test_parse_raw_masterchain() {
        let raw = "-1:0000000000000000000000000000000000000000000000000000000000000000";
        let addr = TonAddress::parse(raw).unwrap();
        assert_eq!(addr.workchain(), -1);
        assert_eq!(addr.to_raw(), raw);
    }

    #[test]
    fn test_friendly_round_trip() {
        let addr = TonAddress::parse(RAW).unwrap();
        let friendly = addr.to_friendly();
        assert_eq!(friendly.len(), 48);
        // URL-safe alphabet only
        assert!(!friendly.contains('+') && !friendly.contains('/') && !friendly.contains('='));

        let reparsed = TonAddress::parse(&friendly).unwrap();
        assert_eq!(reparsed, addr);
        assert_eq!(reparsed.to_raw(), RAW);
    }

    #[test]
    fn test_friendly_standard_alphabet_accepted() {
        let addr = TonAddress::parse(RAW).unwrap();
        let std_form = addr
            .to_friendly()
            .replace('-', "+")
            .replace('_', "/");
        assert_eq!(TonAddress::parse(&std_form).unwrap(), addr);
    }

    #[test]
    fn test_both_encodings_share_lookup_key() {
        let from_raw = TonAddress::parse(RAW).unwrap();
        let from_friendly = TonAddress::parse(&from_raw.to_friendly()).unwrap();
        assert_eq!(from_raw.to_raw(), from_friendly.to_raw());
        assert_eq!(from_raw, from_friendly);
    }

    #[test]
    fn test_checksum_rejected() {
        let addr = TonAddress::parse(RAW).unwrap();
        let mut friendly = addr.to_friendly().into_bytes();
        // Flip one character in the checksum region
        let last = friendly.len() - 1;
        friendly[last] = if friendly[last] == b'A' { b'B' } else { b'A' };
        let corrupted = String::from_utf8(friendly).unwrap();
        assert_eq!(
            TonAddress::parse(&corrupted),
            Err(AddressError::BadChecksum)
        );
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(TonAddress::parse("").is_err());
        assert!(TonAddress::parse("0:zz").is_err());
        assert!(TonAddress::parse("not-an-address").is_err());
        assert!(TonAddress::parse("9999:0000").is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let addr = TonAddress::parse(RAW).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", RAW));
        let back: TonAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
