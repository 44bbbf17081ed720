//! HTTP transport module
//!
//! Provides the GitHub HTTP client behind the `HttpTransport` trait.
//!
//! # Features
//!
//! - **Owned pages**: responses are snapshotted into `Page` values
//! - **Allowlisted responses**: per-endpoint non-2xx statuses treated as data
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor

mod client;
mod rate_limit;
mod types;

pub use client::{GitHubHttpClient, HttpClientConfig, HttpClientConfigBuilder, DEFAULT_API_DOMAIN};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use types::{is_allowlisted, HttpResponseSignature, HttpTransport, Page, LINK_HEADER};

#[cfg(test)]
pub(crate) mod fake;
