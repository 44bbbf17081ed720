//! Tests for output module

use super::*;
use crate::types::JsonObject;
use serde_json::{json, Value};
use tempfile::tempdir;

fn context(record_type: &str) -> RecordContext {
    let mut metadata = JsonObject::new();
    metadata.insert("OrganizationId".to_string(), json!("42"));
    metadata.insert("OrganizationLogin".to_string(), json!("octo"));
    RecordContext {
        record_type: record_type.to_string(),
        api_name: "Issues".to_string(),
        source_url: "https://api.github.com/repos/octo/app/issues".to_string(),
        metadata,
    }
}

fn read_lines(path: &std::path::Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// ============================================================================
// Envelope Tests
// ============================================================================

#[test]
fn test_record_envelope_shape() {
    let ctx = context("GitHub.Issue");
    let record = json!({"id": 7, "title": "Bug"});
    let value = serde_json::to_value(RecordEnvelope::new(&record, &ctx)).unwrap();

    assert_eq!(value["record_type"], "GitHub.Issue");
    assert_eq!(value["metadata"]["OrganizationId"], "42");
    assert_eq!(value["metadata"]["OrganizationLogin"], "octo");
    assert_eq!(value["source_url"], "https://api.github.com/repos/octo/app/issues");
    assert_eq!(value["record"]["title"], "Bug");
}

// ============================================================================
// JSON Lines Sink Tests
// ============================================================================

#[tokio::test]
async fn test_jsonl_sink_writes_per_record_type() {
    let dir = tempdir().unwrap();
    let sink = JsonLinesSink::new(dir.path().join("out"));

    sink.new_output("GitHub.Issue").await.unwrap();
    sink.write_record(&json!({"id": 1}), &context("GitHub.Issue"))
        .await
        .unwrap();
    sink.write_record(&json!({"id": 2}), &context("GitHub.Issue"))
        .await
        .unwrap();
    sink.write_record(&json!({"name": "bug"}), &context("GitHub.Label"))
        .await
        .unwrap();
    sink.finish().await.unwrap();

    let issues = read_lines(&sink.file_path("GitHub.Issue"));
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0]["record"]["id"], 1);
    assert_eq!(issues[1]["record"]["id"], 2);

    let labels = read_lines(&sink.file_path("GitHub.Label"));
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0]["record_type"], "GitHub.Label");
}

#[tokio::test]
async fn test_jsonl_sink_new_output_creates_file() {
    let dir = tempdir().unwrap();
    let sink = JsonLinesSink::new(dir.path());

    sink.new_output("GitHub.Team").await.unwrap();
    sink.finish().await.unwrap();

    assert!(sink.file_path("GitHub.Team").exists());
    assert_eq!(sink.directory(), dir.path());
}

#[tokio::test]
async fn test_jsonl_sink_flush_output_makes_records_visible() {
    let dir = tempdir().unwrap();
    let sink = JsonLinesSink::new(dir.path());

    sink.new_output("GitHub.Issue").await.unwrap();
    sink.write_record(&json!({"id": 1}), &context("GitHub.Issue"))
        .await
        .unwrap();
    sink.flush_output("GitHub.Issue").await.unwrap();

    let lines = read_lines(&sink.file_path("GitHub.Issue"));
    assert_eq!(lines.len(), 1);

    // Nothing open for this type yet
    sink.flush_output("GitHub.Label").await.unwrap();
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_jsonl_sink_flush_output_reports_full_disk() {
    let dir = tempdir().unwrap();
    let sink = JsonLinesSink::new(dir.path());
    std::os::unix::fs::symlink("/dev/full", sink.file_path("GitHub.Issue")).unwrap();

    sink.new_output("GitHub.Issue").await.unwrap();
    sink.write_record(&json!({"id": 1}), &context("GitHub.Issue"))
        .await
        .unwrap();

    let err = sink.flush_output("GitHub.Issue").await.unwrap_err();
    assert!(matches!(err, crate::error::Error::Sink { .. }));
}

#[tokio::test]
async fn test_jsonl_sink_appends_across_instances() {
    let dir = tempdir().unwrap();

    for id in [1, 2] {
        let sink = JsonLinesSink::new(dir.path());
        sink.new_output("GitHub.Issue").await.unwrap();
        sink.write_record(&json!({"id": id}), &context("GitHub.Issue"))
            .await
            .unwrap();
        sink.finish().await.unwrap();
    }

    let lines = read_lines(&dir.path().join("GitHub.Issue.jsonl"));
    assert_eq!(lines.len(), 2);
}

#[tokio::test]
async fn test_stdout_sink_accepts_records() {
    let sink = StdoutSink::new();
    assert_eq!(sink.name(), "stdout");
    sink.new_output("GitHub.Issue").await.unwrap();
    sink.write_record(&json!({"id": 1}), &context("GitHub.Issue"))
        .await
        .unwrap();
    sink.finish().await.unwrap();
}
