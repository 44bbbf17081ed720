// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Point Collector
//!
//! Collects GitHub entities ("points") page by page and writes them to
//! record sinks, skipping endpoints that an earlier run already finished.
//!
//! ## Features
//!
//! - **Link Header Pagination**: follows GitHub's `rel="next"` links to exhaustion
//! - **Completion Cache**: memory or JSON-file store, checked before any fetch
//! - **Allowlisted Responses**: per-API non-2xx statuses treated as empty pages
//! - **Retry and Rate Limiting**: bounded backoff and a GitHub-sized token bucket
//! - **JSON Lines Output**: one file per record type, or stdout
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use point_collector::cache::{CacheGate, MemoryCacheStore};
//! use point_collector::collector::{CollectionRequest, PointCollector};
//! use point_collector::http::{GitHubHttpClient, HttpClientConfig};
//! use point_collector::output::StdoutSink;
//! use point_collector::{PointType, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = GitHubHttpClient::with_config(HttpClientConfig::default())?;
//!     let cache = CacheGate::new(Arc::new(MemoryCacheStore::new()));
//!     let collector = PointCollector::new(Arc::new(client), cache)
//!         .with_sink(Arc::new(StdoutSink::new()));
//!
//!     let request = CollectionRequest::new(
//!         "9919",
//!         "github",
//!         PointType::Issues,
//!         "/repos/github/docs/issues",
//!     );
//!     collector.process(&request).await?;
//!     collector.finish().await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  PointCollector::process(request)               │
//! │   new_output → cache lookup → [skip] | cursor loop → mark done  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │   Cache   │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Anonymous│ Retry     │ Link Header   │ Memory    │ JSON Lines  │
//! │ Token    │ Rate Limit│ Next URL      │ JSON File │ Stdout      │
//! │ Basic    │ Allowlist │ Single        │           │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the collector
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP transport with retry and rate limiting
pub mod http;

/// Pagination cursors
pub mod pagination;

/// Response decoders
pub mod decode;

/// Completion cache
pub mod cache;

/// Record sinks
pub mod output;

/// Cache-gated collection orchestration
pub mod collector;

/// Collector configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use collector::{CollectionOutcome, CollectionRequest, PointCollector};
pub use config::CollectorConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
