//! Decoder types and traits

use crate::error::Result;
use serde_json::Value;

/// Trait for decoding page bodies into records
pub trait RecordDecoder: Send + Sync {
    /// Decode the page body into a list of records
    fn decode(&self, body: &str) -> Result<Vec<Value>>;

    /// Decode the page body into a single JSON value (full response)
    fn decode_raw(&self, body: &str) -> Result<Value>;

    /// Extract the records from an already parsed body
    fn records(&self, value: &Value) -> Vec<Value>;
}
