//! Sink types and traits

use crate::error::Result;
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use serde::Serialize;

/// Where a record came from, passed alongside every record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordContext {
    /// Logical record kind, e.g. `GitHub.Issue`
    pub record_type: String,
    /// API name of the endpoint
    pub api_name: String,
    /// URL of the page the record was read from
    pub source_url: String,
    /// Request metadata (`OrganizationId`, `OrganizationLogin`)
    pub metadata: JsonObject,
}

/// One output line: the record plus its context
#[derive(Debug, Serialize)]
pub struct RecordEnvelope<'a> {
    /// Logical record kind
    pub record_type: &'a str,
    /// Request metadata
    pub metadata: &'a JsonObject,
    /// Page URL
    pub source_url: &'a str,
    /// The record as returned by the API
    pub record: &'a JsonValue,
}

impl<'a> RecordEnvelope<'a> {
    /// Wrap a record in its context
    pub fn new(record: &'a JsonValue, ctx: &'a RecordContext) -> Self {
        Self {
            record_type: &ctx.record_type,
            metadata: &ctx.metadata,
            source_url: &ctx.source_url,
            record,
        }
    }
}

/// Destination for collected records.
///
/// Sinks are shared between concurrent requests and serialise their own
/// writes.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Prepare output for a record type. Called before any page is fetched.
    async fn new_output(&self, record_type: &str) -> Result<()>;

    /// Write one record
    async fn write_record(&self, record: &JsonValue, ctx: &RecordContext) -> Result<()>;

    /// Push everything written for `record_type` to its destination.
    ///
    /// Called once a collection is exhausted and before it is recorded as
    /// complete, so a failure here keeps the request uncached.
    async fn flush_output(&self, record_type: &str) -> Result<()>;

    /// Flush buffered output
    async fn finish(&self) -> Result<()>;
}
