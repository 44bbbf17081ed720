//! Point collector implementation

use super::types::{
    CollectionDescriptor, CollectionOutcome, CollectionRequest, CollectionStats, RunPhase,
};
use crate::auth::{Authentication, Authenticator};
use crate::cache::CacheGate;
use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::{HttpResponseSignature, HttpTransport};
use crate::output::{RecordContext, RecordSink};
use crate::pagination::{CursorStrategy, Endpoint};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Collects one point type per request, gated by the completion cache.
///
/// Every request goes through the same protocol: open outputs, consult the
/// cache, walk the cursor to exhaustion, then record completion. Completion
/// is recorded only after every page has been written.
pub struct PointCollector {
    transport: Arc<dyn HttpTransport>,
    cache: CacheGate,
    auth: Arc<dyn Authentication>,
    sinks: Vec<Arc<dyn RecordSink>>,
    decoder: Arc<dyn RecordDecoder>,
    allowlists: HashMap<String, Arc<[HttpResponseSignature]>>,
    strategies: HashMap<String, CursorStrategy>,
    cancel: Option<watch::Receiver<bool>>,
}

impl PointCollector {
    /// Create a collector with anonymous auth, no sinks and link header pagination
    pub fn new(transport: Arc<dyn HttpTransport>, cache: CacheGate) -> Self {
        Self {
            transport,
            cache,
            auth: Arc::new(Authenticator::anonymous()),
            sinks: Vec::new(),
            decoder: Arc::new(JsonDecoder::new()),
            allowlists: HashMap::new(),
            strategies: HashMap::new(),
            cancel: None,
        }
    }

    /// Set the authentication used for every fetch
    #[must_use]
    pub fn with_auth(mut self, auth: Arc<dyn Authentication>) -> Self {
        self.auth = auth;
        self
    }

    /// Add a sink. Sinks are called in the order they were added.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Set the record decoder
    #[must_use]
    pub fn with_decoder(mut self, decoder: Arc<dyn RecordDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Accept the given non-success responses for an API
    #[must_use]
    pub fn with_allowlist(
        mut self,
        api_name: impl Into<String>,
        signatures: Vec<HttpResponseSignature>,
    ) -> Self {
        self.allowlists.insert(api_name.into(), Arc::from(signatures));
        self
    }

    /// Use a cursor strategy other than the `Link` header for an API
    #[must_use]
    pub fn with_strategy(mut self, api_name: impl Into<String>, strategy: CursorStrategy) -> Self {
        self.strategies.insert(api_name.into(), strategy);
        self
    }

    /// Stop collecting once the watched flag turns true
    #[must_use]
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The cache gate
    pub fn cache(&self) -> &CacheGate {
        &self.cache
    }

    /// Process one request.
    ///
    /// Returns `Skipped` when a completed cache record exists and the
    /// request does not bypass the cache. Any failure leaves the cache
    /// untouched.
    pub async fn process(&self, request: &CollectionRequest) -> Result<CollectionOutcome> {
        let descriptor = CollectionDescriptor::from_request(request);
        info!(
            phase = %RunPhase::Start,
            record_type = descriptor.record_type,
            api_name = descriptor.api_name,
            scope = %request.scope_name,
            url = %descriptor.initial_url,
            "Processing collection request"
        );

        match self.run(request, &descriptor).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(
                    phase = %RunPhase::Failed,
                    record_type = descriptor.record_type,
                    url = %descriptor.initial_url,
                    transport = e.is_transport(),
                    error = %e,
                    "Collection failed"
                );
                Err(e)
            }
        }
    }

    /// Process many independent requests, at most `concurrency` at a time.
    ///
    /// Results are returned in input order.
    pub async fn process_all(
        &self,
        requests: &[CollectionRequest],
        concurrency: usize,
    ) -> Vec<Result<CollectionOutcome>> {
        stream::iter(requests)
            .map(|request| self.process(request))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    /// Flush every sink
    pub async fn finish(&self) -> Result<()> {
        for sink in &self.sinks {
            sink.finish().await?;
        }
        Ok(())
    }

    async fn run(
        &self,
        request: &CollectionRequest,
        descriptor: &CollectionDescriptor,
    ) -> Result<CollectionOutcome> {
        for sink in &self.sinks {
            sink.new_output(descriptor.record_type).await?;
        }

        if request.should_check_cache() {
            if let Some(record) = self.cache.lookup(request).await.filter(|r| r.completed) {
                info!(
                    phase = %RunPhase::Skipped,
                    event = "collection_skipped",
                    record_type = descriptor.record_type,
                    url = %descriptor.initial_url,
                    completed_at = ?record.completed_at,
                    "Already collected, skipping"
                );
                return Ok(CollectionOutcome::Skipped);
            }
        } else {
            debug!(api_name = descriptor.api_name, "Cache bypassed");
        }

        info!(
            phase = %RunPhase::Collecting,
            record_type = descriptor.record_type,
            url = %descriptor.initial_url,
            "Collecting"
        );
        let stats = self.collect(descriptor).await?;

        for sink in &self.sinks {
            sink.flush_output(descriptor.record_type).await?;
        }
        self.cache.mark_complete(request).await?;
        info!(
            phase = %RunPhase::Cached,
            record_type = descriptor.record_type,
            url = %descriptor.initial_url,
            pages = stats.pages_fetched,
            records = stats.records_emitted,
            duration_ms = stats.duration_ms,
            "Collection complete"
        );

        Ok(CollectionOutcome::Collected(stats))
    }

    async fn collect(&self, descriptor: &CollectionDescriptor) -> Result<CollectionStats> {
        let start = Instant::now();
        let mut stats = CollectionStats::new();

        let endpoint = Endpoint {
            transport: Arc::clone(&self.transport),
            api_name: descriptor.api_name.to_string(),
            allowlist: self
                .allowlists
                .get(descriptor.api_name)
                .cloned()
                .unwrap_or_else(|| Arc::from(Vec::new())),
        };
        let strategy = self
            .strategies
            .get(descriptor.api_name)
            .cloned()
            .unwrap_or_default();
        let mut cursor = strategy.build(endpoint, &descriptor.initial_url);

        loop {
            if let Some(url) = cursor.current_url() {
                if self.is_cancelled() {
                    return Err(Error::cancelled(url));
                }
            }

            let Some(page) = cursor.advance(self.auth.as_ref()).await? else {
                break;
            };

            let (body, records) = if page.allowlisted {
                debug!(status = page.status, url = %page.url, "Allowlisted response, no records");
                (Value::Null, Vec::new())
            } else {
                let body = self.decoder.decode_raw(&page.body)?;
                let records = self.decoder.records(&body);
                (body, records)
            };

            let ctx = RecordContext {
                record_type: descriptor.record_type.to_string(),
                api_name: descriptor.api_name.to_string(),
                source_url: page.url.clone(),
                metadata: descriptor.metadata.clone(),
            };
            for record in &records {
                for sink in &self.sinks {
                    sink.write_record(record, &ctx).await?;
                }
            }

            stats.add_page(records.len(), page.allowlisted);
            debug!(
                page = stats.pages_fetched,
                records = records.len(),
                url = %page.url,
                has_next = cursor.has_next(),
                "Page collected"
            );

            cursor.update_availability(&body, records.len());
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok(stats)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }
}

impl std::fmt::Debug for PointCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointCollector")
            .field("identity", &self.auth.identity())
            .field("sinks", &self.sinks.iter().map(|s| s.name()).collect::<Vec<_>>())
            .field("strategies", &self.strategies)
            .finish_non_exhaustive()
    }
}
