//! Market Data Adapters
//!
//! External fiat price source for the optional USD enrichment:
//! - `CoingeckoClient`: CoinGecko simple-price lookup
//! - `PricePoller`: fixed-interval polling onto a watch channel

mod coingecko;

pub use coingecko::{CoingeckoClient, CoingeckoConfig, PricePoller};
