//! Decoder implementations

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use serde_json::Value;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction.
///
/// Without a path, a top-level array yields its elements and any other
/// value yields one record. An empty body yields no records.
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dotted path to the record array
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let value = self.decode_raw(body)?;
        Ok(self.records(&value))
    }

    fn decode_raw(&self, body: &str) -> Result<Value> {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(body).map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))
    }

    fn records(&self, value: &Value) -> Vec<Value> {
        let target = match &self.record_path {
            Some(path) => match lookup_path(value, path) {
                Some(v) => v,
                None => return Vec::new(),
            },
            None => value,
        };

        match target {
            Value::Null => Vec::new(),
            Value::Array(arr) => arr.clone(),
            other => vec![other.clone()],
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Read a string at a dotted path (`$.` prefix optional).
///
/// Numbers are rendered as strings; anything else yields `None`.
pub fn extract_path(value: &Value, path: &str) -> Option<String> {
    match lookup_path(value, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Walk a dotted path, supporting `name[index]` segments with negative indices
fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        let Some(bracket_pos) = part.find('[') else {
            current = current.get(part)?;
            continue;
        };

        let name = &part[..bracket_pos];
        let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

        if !name.is_empty() {
            current = current.get(name)?;
        }

        let index = index_str.parse::<i64>().ok()?;
        let arr = current.as_array()?;
        let idx = if index < 0 {
            arr.len().checked_sub(usize::try_from(index.unsigned_abs()).ok()?)?
        } else {
            usize::try_from(index).ok()?
        };
        current = arr.get(idx)?;
    }

    Some(current)
}
