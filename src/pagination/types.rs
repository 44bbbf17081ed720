//! Pagination types and traits
//!
//! Defines the cursor state shared by every strategy and the
//! `BatchingRequest` capability the collector drives.

use crate::auth::Authentication;
use crate::error::Result;
use crate::http::{HttpResponseSignature, HttpTransport, Page};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Position of one cursor within a paginated endpoint.
///
/// `has_next == true` implies `current_url` is `Some`. Once `has_next`
/// turns false it stays false for the lifetime of the cursor and
/// `current_url` is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorState {
    /// URL of the next page to fetch
    pub current_url: Option<String>,
    /// Whether another page is available
    pub has_next: bool,
    /// URL of the most recently fetched page
    pub previous_url: Option<String>,
    /// Identity that fetched the most recent page
    pub previous_identity: Option<String>,
    /// Number of pages fetched so far
    pub pages_fetched: u64,
}

impl CursorState {
    /// Create a cursor positioned at the initial URL
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            current_url: Some(initial_url.into()),
            has_next: true,
            ..Default::default()
        }
    }

    /// Record a completed fetch and optimistically assume it was the last page
    pub fn record_fetch(&mut self, identity: &str) {
        self.has_next = false;
        self.previous_url = self.current_url.take();
        self.previous_identity = Some(identity.to_string());
        self.pages_fetched += 1;
    }

    /// Point the cursor at the next page
    pub fn set_next(&mut self, url: String) {
        self.current_url = Some(url);
        self.has_next = true;
    }

    /// End the sequence permanently
    pub fn exhaust(&mut self) {
        self.has_next = false;
        self.current_url = None;
    }
}

/// A lazy, finite, forward-only sequence of pages for one endpoint.
///
/// Strategies differ in how they discover the next page: the `Link`
/// header, a URL in the body, or not at all.
#[async_trait]
pub trait BatchingRequest: Send {
    /// Fetch the next page, or `None` once the sequence is exhausted.
    ///
    /// After exhaustion this performs no I/O and keeps returning `None`.
    /// A failed fetch ends the sequence before the error is returned.
    async fn advance(&mut self, auth: &dyn Authentication) -> Result<Option<Page>>;

    /// Let the strategy react to the decoded body and record count of the
    /// page just returned by `advance`. May only end the sequence.
    fn update_availability(&mut self, body: &Value, record_count: usize);

    /// Current cursor state
    fn state(&self) -> &CursorState;

    /// Whether another page is available
    fn has_next(&self) -> bool {
        self.state().has_next
    }

    /// URL that the next `advance` would fetch
    fn current_url(&self) -> Option<&str> {
        self.state().current_url.as_deref()
    }
}

/// Which cursor strategy an endpoint uses
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CursorStrategy {
    /// `Link: <url>; rel="next"` header pagination (GitHub REST)
    #[default]
    LinkHeader,
    /// Next page URL found at a dotted path in the JSON body
    NextUrl {
        /// Path to the next URL, e.g. `pagination.next`
        path: String,
    },
    /// Exactly one request
    Single,
}

/// Shared fetch step: one request against `current_url`, then bookkeeping.
pub(crate) async fn fetch_current(
    transport: &dyn HttpTransport,
    state: &mut CursorState,
    auth: &dyn Authentication,
    api_name: &str,
    allowlist: &[HttpResponseSignature],
) -> Result<Option<Page>> {
    if !state.has_next {
        return Ok(None);
    }
    let Some(url) = state.current_url.clone() else {
        state.exhaust();
        return Ok(None);
    };

    match transport.fetch(&url, auth, api_name, allowlist).await {
        Ok(page) => {
            state.record_fetch(auth.identity());
            Ok(Some(page))
        }
        Err(e) => {
            warn!(api_name, url = %url, error = %e, "Page fetch failed, ending pagination");
            state.exhaust();
            Err(e)
        }
    }
}
