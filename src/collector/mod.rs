//! Collector module
//!
//! Runs collection requests end to end.
//!
//! # Overview
//!
//! A request moves through `START → SKIPPED` on a cache hit, or
//! `START → COLLECTING → CACHED` when every page was written, or
//! `START → COLLECTING → FAILED` on any fetch, decode, sink or cache-write
//! error and on cancellation. Pages of one request are fetched strictly in
//! order; independent requests may run concurrently through
//! `PointCollector::process_all`.

mod point_collector;
mod types;

pub use point_collector::PointCollector;
pub use types::{
    CollectionDescriptor, CollectionOutcome, CollectionRequest, CollectionStats, RunPhase,
    ORGANIZATION_ID, ORGANIZATION_LOGIN,
};
