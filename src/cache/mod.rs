//! Cache module
//!
//! Remembers which collection requests already completed so repeated runs
//! skip them.
//!
//! # Overview
//!
//! - `CacheKey` / `CacheRecord` - what is stored, keyed by
//!   `{scope_id}|{point_type}|{url}`
//! - `CacheStore` - async key/value store (`MemoryCacheStore`, `FileCacheStore`)
//! - `CacheGate` - the read-then-write protocol the collector follows

mod gate;
mod store;
mod types;

pub use gate::CacheGate;
pub use store::{CacheStore, FileCacheStore, MemoryCacheStore};
pub use types::{CacheKey, CacheRecord};

#[cfg(test)]
pub(crate) mod fake;
