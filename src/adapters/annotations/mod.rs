//! Static Annotation Documents
//!
//! Two pre-shaped JSON documents enrich the holder view without touching
//! the analytics path:
//! - address tag labels ("exchange", "bridge", ...), joined to holders
//!   through the canonical address key
//! - the distribution-bucket report, computed out-of-band and rendered
//!   as-is

mod distribution;
mod tags;

pub use distribution::{load_distribution, DistributionBucket};
pub use tags::{TagDirectory, TagEntry, TagError};
