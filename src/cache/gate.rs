//! Cache gate
//!
//! Decides whether a request was already collected and records completion.

use super::store::CacheStore;
use super::types::{CacheKey, CacheRecord};
use crate::collector::CollectionRequest;
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// Read/write gate over an injected cache store
#[derive(Clone)]
pub struct CacheGate {
    store: Arc<dyn CacheStore>,
}

impl CacheGate {
    /// Create a gate over `store`
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Look up the completion record for a request.
    ///
    /// A store failure is logged and reported as "not cached".
    pub async fn lookup(&self, request: &CollectionRequest) -> Option<CacheRecord> {
        let key = CacheKey::for_request(request).canonical();
        match self.store.get(&key).await {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as not cached");
                None
            }
        }
    }

    /// Whether a completed record exists for a request
    pub async fn is_complete(&self, request: &CollectionRequest) -> bool {
        self.lookup(request).await.is_some_and(|r| r.completed)
    }

    /// Record that a request was fully collected. Idempotent.
    pub async fn mark_complete(&self, request: &CollectionRequest) -> Result<()> {
        let record = CacheRecord::completed(CacheKey::for_request(request));
        debug!(key = %record.key, "Marking collection complete");
        self.store.put(record).await
    }
}

impl std::fmt::Debug for CacheGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheGate").finish_non_exhaustive()
    }
}
