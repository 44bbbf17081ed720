//! Transport types
//!
//! The core consumes HTTP through `HttpTransport` and only ever sees owned
//! `Page` snapshots, never live `reqwest::Response` values.

use crate::auth::Authentication;
use crate::error::{Error, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::HeaderMap;
use serde_json::Value;

/// Name of the pagination header
pub const LINK_HEADER: &str = "link";

/// A non-success response that a given endpoint treats as acceptable.
///
/// Matches when the status is equal and, if a body pattern is configured,
/// the pattern matches somewhere in the response body.
#[derive(Debug, Clone)]
pub struct HttpResponseSignature {
    /// HTTP status code
    pub status: u16,
    /// Optional body predicate
    pub body_pattern: Option<Regex>,
}

impl HttpResponseSignature {
    /// Match any body with the given status
    pub fn new(status: u16) -> Self {
        Self {
            status,
            body_pattern: None,
        }
    }

    /// Match the given status only when the body matches `pattern`
    pub fn with_pattern(status: u16, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::invalid_value("body_pattern", format!("{pattern}: {e}")))?;
        Ok(Self {
            status,
            body_pattern: Some(regex),
        })
    }

    /// Check a response against this signature
    pub fn matches(&self, status: u16, body: &str) -> bool {
        if self.status != status {
            return false;
        }
        self.body_pattern
            .as_ref()
            .map_or(true, |pattern| pattern.is_match(body))
    }
}

/// Check whether any signature in the allowlist matches
pub fn is_allowlisted(allowlist: &[HttpResponseSignature], status: u16, body: &str) -> bool {
    allowlist.iter().any(|s| s.matches(status, body))
}

/// One fetched page: an owned snapshot of the HTTP response
#[derive(Debug, Clone)]
pub struct Page {
    /// URL the page was fetched from
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: String,
    /// True when the status was non-success but matched an allowlisted signature
    pub allowlisted: bool,
}

impl Page {
    /// Create a successful page (mostly useful for tests and fakes)
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            allowlisted: false,
        }
    }

    /// Check if the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the pagination header, if present
    pub fn link_header(&self) -> Option<&str> {
        self.header(LINK_HEADER)
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON from {}: {e}", self.url)))
    }
}

/// HTTP transport collaborator.
///
/// Errors for non-allowlisted, non-success statuses and network faults.
/// Retry and backoff live behind this trait, never in the cursors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetch one URL with the caller's credentials
    async fn fetch(
        &self,
        url: &str,
        auth: &dyn Authentication,
        api_name: &str,
        allowlist: &[HttpResponseSignature],
    ) -> Result<Page>;
}
