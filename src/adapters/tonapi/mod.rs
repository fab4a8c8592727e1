//! TonAPI Adapter
//!
//! Rate-limited client for the TonAPI jetton index plus the permissive
//! decode boundary that turns its drifting payload shapes into canonical
//! domain records.

mod client;
pub mod decode;

pub use client::{RateLimiter, TonapiClient, TonapiConfig};
