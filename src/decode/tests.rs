//! Tests for decoder module

use super::*;
use serde_json::json;

// ============================================================================
// JSON Decoder Tests
// ============================================================================

#[test]
fn test_json_decoder_array() {
    let decoder = JsonDecoder::new();
    let body = r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[2]["id"], 3);
}

#[test]
fn test_json_decoder_object_is_one_record() {
    let decoder = JsonDecoder::new();
    let records = decoder.decode(r#"{"login": "octo", "id": 42}"#).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["login"], "octo");
}

#[test]
fn test_json_decoder_empty_array() {
    let decoder = JsonDecoder::new();
    assert!(decoder.decode("[]").unwrap().is_empty());
}

#[test]
fn test_json_decoder_empty_body() {
    let decoder = JsonDecoder::new();
    assert!(decoder.decode("").unwrap().is_empty());
    assert!(decoder.decode("  \n").unwrap().is_empty());
}

#[test]
fn test_json_decoder_with_path() {
    let decoder = JsonDecoder::with_path("$.workflow_runs");
    let body = r#"{"total_count": 2, "workflow_runs": [{"id": 1}, {"id": 2}]}"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["id"], 2);
}

#[test]
fn test_json_decoder_missing_path() {
    let decoder = JsonDecoder::with_path("data.items");
    let records = decoder.decode(r#"{"other": []}"#).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_json_decoder_invalid_json() {
    let decoder = JsonDecoder::new();
    let result = decoder.decode("{not json");
    assert!(matches!(result, Err(crate::error::Error::Decode { .. })));
}

#[test]
fn test_json_decoder_decode_raw() {
    let decoder = JsonDecoder::new();
    let value = decoder.decode_raw(r#"{"a": 1}"#).unwrap();
    assert_eq!(value, json!({"a": 1}));
}

// ============================================================================
// Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_path_nested() {
    let value = json!({"pagination": {"next": "https://api.github.com/x?page=3"}});
    assert_eq!(
        extract_path(&value, "pagination.next"),
        Some("https://api.github.com/x?page=3".to_string())
    );
    assert_eq!(
        extract_path(&value, "$.pagination.next"),
        Some("https://api.github.com/x?page=3".to_string())
    );
}

#[test]
fn test_extract_path_number_and_missing() {
    let value = json!({"meta": {"page": 4, "done": true}});
    assert_eq!(extract_path(&value, "meta.page"), Some("4".to_string()));
    assert_eq!(extract_path(&value, "meta.done"), None);
    assert_eq!(extract_path(&value, "meta.missing"), None);
}

#[test]
fn test_extract_path_array_index() {
    let value = json!({"items": [{"url": "first"}, {"url": "last"}]});
    assert_eq!(extract_path(&value, "items[0].url"), Some("first".to_string()));
    assert_eq!(extract_path(&value, "items[-1].url"), Some("last".to_string()));
    assert_eq!(extract_path(&value, "items[5].url"), None);
    assert_eq!(extract_path(&value, "items[-3].url"), None);
}
