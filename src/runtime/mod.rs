//! Async adapters over the blocking resolver.

pub mod api;
pub mod blocking;

pub use api::{lookup, PoolLookup};
pub use blocking::AsyncPoolResolver;
