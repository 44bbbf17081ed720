//! Tests for the CLI

use super::*;
use crate::auth::Authentication;
use crate::cache::{CacheStore, FileCacheStore};
use crate::types::PointType;
use clap::Parser;
use std::path::PathBuf;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("point-collector").chain(args.iter().copied())).unwrap()
}

// ============================================================================
// Argument Parsing Tests
// ============================================================================

#[test]
fn test_parse_collect() {
    let cli = parse(&[
        "collect",
        "--scope-id",
        "42",
        "--scope-name",
        "octo",
        "--point-type",
        "pullrequests",
        "--url",
        "https://api.github.com/repos/octo/app/pulls",
        "--ignore-cache-for-apis",
        "PullRequests,Issues",
    ]);

    match cli.command {
        Commands::Collect {
            scope_id,
            point_type,
            ignore_cache,
            ignore_cache_for_apis,
            ..
        } => {
            assert_eq!(scope_id, "42");
            assert_eq!(point_type, PointType::PullRequests);
            assert!(!ignore_cache);
            assert_eq!(ignore_cache_for_apis, vec!["PullRequests", "Issues"]);
        }
        other => panic!("Expected Collect, got {other:?}"),
    }
}

#[test]
fn test_parse_rejects_unknown_point_type() {
    let result = Cli::try_parse_from([
        "point-collector",
        "collect",
        "--scope-id",
        "1",
        "--scope-name",
        "x",
        "--point-type",
        "Gists",
        "--url",
        "https://x",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = parse(&[
        "collect-batch",
        "--input",
        "requests.json",
        "--concurrency",
        "8",
        "--cache",
        "cache.json",
        "-o",
        "out",
        "-v",
    ]);

    assert_eq!(cli.cache, Some(PathBuf::from("cache.json")));
    assert_eq!(cli.output, Some(PathBuf::from("out")));
    assert!(cli.verbose);
    assert!(matches!(
        cli.command,
        Commands::CollectBatch {
            concurrency: Some(8),
            ..
        }
    ));
}

#[test]
fn test_parse_cache_actions() {
    let cli = parse(&["cache", "show"]);
    assert!(matches!(
        cli.command,
        Commands::Cache {
            action: CacheAction::Show
        }
    ));

    let cli = parse(&["cache", "clear"]);
    assert!(matches!(
        cli.command,
        Commands::Cache {
            action: CacheAction::Clear
        }
    ));
}

// ============================================================================
// Runner Tests
// ============================================================================

#[test]
fn test_effective_config_overrides() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("collector.yaml");
    std::fs::write(
        &config_path,
        "api_domain: github.example.com\ncache:\n  path: from-file.json\n",
    )
    .unwrap();

    let cli = parse(&[
        "-C",
        config_path.to_str().unwrap(),
        "--cache",
        "from-flag.json",
        "--api-domain",
        "http://127.0.0.1:9999",
        "cache",
        "show",
    ]);
    let config = Runner::new(cli).effective_config().unwrap();

    assert_eq!(config.cache.path, Some(PathBuf::from("from-flag.json")));
    assert_eq!(config.base_url(), "http://127.0.0.1:9999");
}

#[test]
fn test_authenticator_from_token() {
    let cli = parse(&["--token", "ghp_secret1234", "cache", "show"]);
    let auth = Runner::new(cli).authenticator();
    assert!(!auth.identity().contains("secret"));
    assert_ne!(auth.identity(), "anonymous");
}

#[tokio::test]
async fn test_cache_show_requires_cache_file() {
    let cli = parse(&["cache", "show"]);
    let result = Runner::new(cli).run().await;
    assert!(matches!(result, Err(crate::error::Error::Config { .. })));
}

#[tokio::test]
async fn test_collect_then_skip_then_clear() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/app/labels"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{"name": "bug"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let cache = dir.path().join("cache.json");
    let out = dir.path().join("out");
    let args = |extra: &[&str]| {
        let mut args = vec![
            "--api-domain".to_string(),
            server.uri(),
            "--cache".to_string(),
            cache.display().to_string(),
            "--output".to_string(),
            out.display().to_string(),
        ];
        args.extend(extra.iter().map(ToString::to_string));
        Cli::try_parse_from(std::iter::once("point-collector".to_string()).chain(args)).unwrap()
    };
    let collect = [
        "collect",
        "--scope-id",
        "42",
        "--scope-name",
        "octo",
        "--point-type",
        "Labels",
        "--url",
        "/repos/octo/app/labels",
    ];

    Runner::new(args(&collect)).run().await.unwrap();
    Runner::new(args(&collect)).run().await.unwrap();

    let lines = std::fs::read_to_string(out.join("GitHub.Label.jsonl")).unwrap();
    assert_eq!(lines.lines().count(), 1);

    let store = FileCacheStore::open(&cache).await.unwrap();
    assert_eq!(store.len().await.unwrap(), 1);

    Runner::new(args(&["cache", "clear"])).run().await.unwrap();
    let store = FileCacheStore::open(&cache).await.unwrap();
    assert!(store.is_empty().await.unwrap());
}
