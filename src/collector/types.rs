//! Collector types
//!
//! Requests, descriptors and outcomes for one collection run.

use crate::types::{JsonObject, JsonValue, PointType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Metadata key carrying the scope identifier
pub const ORGANIZATION_ID: &str = "OrganizationId";

/// Metadata key carrying the scope display name
pub const ORGANIZATION_LOGIN: &str = "OrganizationLogin";

/// One logical unit of collection work: a point type at a URL for a scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRequest {
    /// Scope identifier (organization id)
    pub scope_id: String,
    /// Scope display name (organization login)
    pub scope_name: String,
    /// Which GitHub entity is collected
    pub point_type: PointType,
    /// Initial endpoint URL
    pub url: String,
    /// Bypass the cache for this request
    #[serde(default)]
    pub ignore_cache: bool,
    /// API names for which the cache is bypassed
    #[serde(default)]
    pub ignore_cache_for_apis: HashSet<String>,
}

impl CollectionRequest {
    /// Create a request that consults the cache
    pub fn new(
        scope_id: impl Into<String>,
        scope_name: impl Into<String>,
        point_type: PointType,
        url: impl Into<String>,
    ) -> Self {
        Self {
            scope_id: scope_id.into(),
            scope_name: scope_name.into(),
            point_type,
            url: url.into(),
            ignore_cache: false,
            ignore_cache_for_apis: HashSet::new(),
        }
    }

    /// Bypass the cache entirely
    #[must_use]
    pub fn with_ignore_cache(mut self, ignore: bool) -> Self {
        self.ignore_cache = ignore;
        self
    }

    /// Bypass the cache for one API name
    #[must_use]
    pub fn ignore_cache_for(mut self, api_name: impl Into<String>) -> Self {
        self.ignore_cache_for_apis.insert(api_name.into());
        self
    }

    /// Whether the cache should be consulted before collecting
    pub fn should_check_cache(&self) -> bool {
        !self.ignore_cache && !self.ignore_cache_for_apis.contains(self.point_type.api_name())
    }
}

/// Everything derived from a request that the collection loop needs
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDescriptor {
    /// Logical record kind, e.g. `GitHub.Issue`
    pub record_type: &'static str,
    /// API name used for allowlists and cache bypass
    pub api_name: &'static str,
    /// First page URL
    pub initial_url: String,
    /// Metadata attached to every emitted record
    pub metadata: JsonObject,
}

impl CollectionDescriptor {
    /// Derive the descriptor for a request
    pub fn from_request(request: &CollectionRequest) -> Self {
        let mut metadata = JsonObject::new();
        metadata.insert(
            ORGANIZATION_ID.to_string(),
            JsonValue::String(request.scope_id.clone()),
        );
        metadata.insert(
            ORGANIZATION_LOGIN.to_string(),
            JsonValue::String(request.scope_name.clone()),
        );

        Self {
            record_type: request.point_type.record_type(),
            api_name: request.point_type.api_name(),
            initial_url: request.url.clone(),
            metadata,
        }
    }
}

/// Phases of one collection run, logged on each transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Request accepted
    Start,
    /// Cache hit, nothing fetched
    Skipped,
    /// Pages are being fetched
    Collecting,
    /// All pages emitted and completion recorded
    Cached,
    /// Collection aborted
    Failed,
}

impl RunPhase {
    /// Phase name as logged
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Skipped => "SKIPPED",
            Self::Collecting => "COLLECTING",
            Self::Cached => "CACHED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statistics from one collection run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Pages fetched
    pub pages_fetched: u64,
    /// Records written to the sinks
    pub records_emitted: u64,
    /// Pages accepted through the allowlist
    pub allowlisted_pages: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl CollectionStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one page and its records
    pub fn add_page(&mut self, records: usize, allowlisted: bool) {
        self.pages_fetched += 1;
        self.records_emitted += records as u64;
        if allowlisted {
            self.allowlisted_pages += 1;
        }
    }
}

/// Result of processing one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionOutcome {
    /// A completed cache record was found, nothing was fetched
    Skipped,
    /// Every page was collected and completion recorded
    Collected(CollectionStats),
}

impl CollectionOutcome {
    /// Check if the request was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Stats of a collected run
    pub fn stats(&self) -> Option<&CollectionStats> {
        match self {
            Self::Skipped => None,
            Self::Collected(stats) => Some(stats),
        }
    }
}
