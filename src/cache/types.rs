//! Cache types
//!
//! These types are serialized to JSON and persisted between runs.

use crate::collector::CollectionRequest;
use crate::types::PointType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one collection request in the cache
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Scope identifier
    pub scope_id: String,
    /// Point type collected
    pub point_type: PointType,
    /// Initial endpoint URL
    pub url: String,
}

impl CacheKey {
    /// Create a key
    pub fn new(scope_id: impl Into<String>, point_type: PointType, url: impl Into<String>) -> Self {
        Self {
            scope_id: scope_id.into(),
            point_type,
            url: url.into(),
        }
    }

    /// Key for a collection request
    pub fn for_request(request: &CollectionRequest) -> Self {
        Self::new(&request.scope_id, request.point_type, &request.url)
    }

    /// Canonical store key: `{scope_id}|{point_type}|{url}`
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.scope_id, self.point_type, self.url)
    }
}

/// Completion record for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Which request this record describes
    pub key: CacheKey,
    /// Whether every page was collected
    pub completed: bool,
    /// When the collection completed
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CacheRecord {
    /// A record marking `key` complete as of now
    pub fn completed(key: CacheKey) -> Self {
        Self {
            key,
            completed: true,
            completed_at: Some(Utc::now()),
        }
    }

    /// Canonical store key of this record
    pub fn store_key(&self) -> String {
        self.key.canonical()
    }
}
