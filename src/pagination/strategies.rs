//! Cursor strategy implementations
//!
//! Each strategy handles a specific way of discovering the next page.

use super::types::{fetch_current, BatchingRequest, CursorState, CursorStrategy};
use crate::auth::Authentication;
use crate::decode::extract_path;
use crate::error::Result;
use crate::http::{HttpResponseSignature, HttpTransport, Page};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Relation token that drives continuation
const REL_NEXT: &str = "rel=\"next\"";

/// What every cursor needs to issue a request for one endpoint
#[derive(Clone)]
pub struct Endpoint {
    /// Transport used for every page
    pub transport: Arc<dyn HttpTransport>,
    /// API name passed to the transport
    pub api_name: String,
    /// Non-success responses accepted for this endpoint
    pub allowlist: Arc<[HttpResponseSignature]>,
}

impl Endpoint {
    /// Create an endpoint with no allowlisted responses
    pub fn new(transport: Arc<dyn HttpTransport>, api_name: impl Into<String>) -> Self {
        Self {
            transport,
            api_name: api_name.into(),
            allowlist: Arc::from(Vec::new()),
        }
    }

    /// Set the allowlisted responses
    #[must_use]
    pub fn with_allowlist(mut self, allowlist: Vec<HttpResponseSignature>) -> Self {
        self.allowlist = Arc::from(allowlist);
        self
    }

    async fn fetch(
        &self,
        state: &mut CursorState,
        auth: &dyn Authentication,
    ) -> Result<Option<Page>> {
        fetch_current(
            self.transport.as_ref(),
            state,
            auth,
            &self.api_name,
            &self.allowlist,
        )
        .await
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("api_name", &self.api_name)
            .field("allowlist", &self.allowlist)
            .finish_non_exhaustive()
    }
}

impl CursorStrategy {
    /// Build a cursor for `initial_url` using this strategy
    pub fn build(&self, endpoint: Endpoint, initial_url: &str) -> Box<dyn BatchingRequest> {
        match self {
            CursorStrategy::LinkHeader => Box::new(LinkHeaderCursor::new(endpoint, initial_url)),
            CursorStrategy::NextUrl { path } => {
                Box::new(NextUrlCursor::new(endpoint, initial_url, path.clone()))
            }
            CursorStrategy::Single => Box::new(SingleRequest::new(endpoint, initial_url)),
        }
    }
}

// ============================================================================
// Link Header Pagination
// ============================================================================

/// Link header pagination, as used by the GitHub REST API.
///
/// Format: `Link: <https://api.github.com/...?page=2>; rel="next", <...>; rel="last"`
#[derive(Debug)]
pub struct LinkHeaderCursor {
    endpoint: Endpoint,
    state: CursorState,
}

impl LinkHeaderCursor {
    /// Create a new link header cursor
    pub fn new(endpoint: Endpoint, initial_url: impl Into<String>) -> Self {
        Self {
            endpoint,
            state: CursorState::new(initial_url),
        }
    }
}

#[async_trait]
impl BatchingRequest for LinkHeaderCursor {
    async fn advance(&mut self, auth: &dyn Authentication) -> Result<Option<Page>> {
        let Some(page) = self.endpoint.fetch(&mut self.state, auth).await? else {
            return Ok(None);
        };

        if let Some(next) = page.link_header().and_then(parse_link_header) {
            debug!(api_name = %self.endpoint.api_name, next = %next, "Following next link");
            self.state.set_next(next);
        }

        Ok(Some(page))
    }

    fn update_availability(&mut self, _body: &Value, _record_count: usize) {
        // The Link header already decided continuation.
    }

    fn state(&self) -> &CursorState {
        &self.state
    }
}

/// Extract the `rel="next"` URL from a Link header value.
///
/// Entries are separated by `", "`, each entry is `<URL>; rel="RELATION"`.
/// Only the first `rel="next"` entry is honored. Malformed entries never
/// fail: they are skipped, and a malformed `next` entry means no next page.
pub fn parse_link_header(header: &str) -> Option<String> {
    for entry in header.split(", ") {
        let mut parts = entry.split("; ");
        let url_part = parts.next().unwrap_or_default();
        let Some(relation) = parts.next() else {
            warn!(entry, "Malformed Link header entry, ignoring");
            continue;
        };

        if relation != REL_NEXT {
            continue;
        }

        return match bracketed_url(url_part) {
            Some(url) => Some(url.to_string()),
            None => {
                warn!(entry, "Malformed next link, treating as last page");
                None
            }
        };
    }

    None
}

/// Substring between the first `<` and the matching `>`
fn bracketed_url(part: &str) -> Option<&str> {
    let start = part.find('<')? + 1;
    let len = part[start..].find('>')?;
    let url = &part[start..start + len];
    (!url.is_empty()).then_some(url)
}

// ============================================================================
// Next URL Pagination
// ============================================================================

/// Next URL pagination (URL in response body).
///
/// Common patterns:
/// - `{ "next": "https://api.example.com/items?page=2" }`
/// - `{ "pagination": { "next_url": "..." } }`
///
/// An empty page ends the sequence even when a next URL is present.
#[derive(Debug)]
pub struct NextUrlCursor {
    endpoint: Endpoint,
    state: CursorState,
    path: String,
}

impl NextUrlCursor {
    /// Create a new next URL cursor
    pub fn new(endpoint: Endpoint, initial_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            endpoint,
            state: CursorState::new(initial_url),
            path: path.into(),
        }
    }
}

#[async_trait]
impl BatchingRequest for NextUrlCursor {
    async fn advance(&mut self, auth: &dyn Authentication) -> Result<Option<Page>> {
        let Some(page) = self.endpoint.fetch(&mut self.state, auth).await? else {
            return Ok(None);
        };

        match page.json() {
            Ok(body) => {
                if let Some(next) = extract_path(&body, &self.path).filter(|u| !u.is_empty()) {
                    self.state.set_next(next);
                }
            }
            Err(e) => warn!(url = %page.url, error = %e, "Unreadable body, treating as last page"),
        }

        Ok(Some(page))
    }

    fn update_availability(&mut self, _body: &Value, record_count: usize) {
        if record_count == 0 && self.state.has_next {
            debug!(api_name = %self.endpoint.api_name, "Empty page, ending pagination");
            self.state.exhaust();
        }
    }

    fn state(&self) -> &CursorState {
        &self.state
    }
}

// ============================================================================
// Single Request
// ============================================================================

/// No pagination - single request
#[derive(Debug)]
pub struct SingleRequest {
    endpoint: Endpoint,
    state: CursorState,
}

impl SingleRequest {
    /// Create a single-request cursor
    pub fn new(endpoint: Endpoint, url: impl Into<String>) -> Self {
        Self {
            endpoint,
            state: CursorState::new(url),
        }
    }
}

#[async_trait]
impl BatchingRequest for SingleRequest {
    async fn advance(&mut self, auth: &dyn Authentication) -> Result<Option<Page>> {
        self.endpoint.fetch(&mut self.state, auth).await
    }

    fn update_availability(&mut self, _body: &Value, _record_count: usize) {}

    fn state(&self) -> &CursorState {
        &self.state
    }
}
