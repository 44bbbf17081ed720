//! CLI runner - executes commands

use crate::auth::{AuthConfig, Authentication, Authenticator};
use crate::cache::{CacheGate, CacheStore, FileCacheStore, MemoryCacheStore};
use crate::cli::commands::{CacheAction, Cli, Commands};
use crate::collector::{CollectionOutcome, CollectionRequest, PointCollector};
use crate::config::CollectorConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::GitHubHttpClient;
use crate::output::{JsonLinesSink, RecordSink, StdoutSink};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.effective_config()?;

        match &self.cli.command {
            Commands::Collect {
                scope_id,
                scope_name,
                point_type,
                url,
                ignore_cache,
                ignore_cache_for_apis,
            } => {
                let mut request =
                    CollectionRequest::new(scope_id, scope_name, *point_type, url.as_str())
                        .with_ignore_cache(*ignore_cache);
                request
                    .ignore_cache_for_apis
                    .extend(ignore_cache_for_apis.iter().cloned());
                self.collect(&config, request).await
            }
            Commands::CollectBatch { input, concurrency } => {
                let concurrency = concurrency.unwrap_or(config.concurrency);
                self.collect_batch(&config, input, concurrency).await
            }
            Commands::Cache { action } => self.cache(&config, *action).await,
        }
    }

    /// Config file values with command-line overrides applied
    pub fn effective_config(&self) -> Result<CollectorConfig> {
        let mut config = match &self.cli.config {
            Some(path) => CollectorConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => CollectorConfig::default(),
        };

        if let Some(cache) = &self.cli.cache {
            config.cache.path = Some(cache.clone());
        }
        if let Some(output) = &self.cli.output {
            config.output.directory = Some(output.clone());
        }
        if let Some(domain) = &self.cli.api_domain {
            config.api_domain = domain.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Authentication from `--token` / `GITHUB_TOKEN`
    pub fn authenticator(&self) -> Authenticator {
        match &self.cli.token {
            Some(token) => Authenticator::new(AuthConfig::token(token.as_str())),
            None => Authenticator::anonymous(),
        }
    }

    /// Collect a single request
    async fn collect(&self, config: &CollectorConfig, request: CollectionRequest) -> Result<()> {
        let collector = self.build_collector(config).await?;
        let start = Instant::now();

        let result = collector.process(&request).await;
        collector.finish().await?;

        let outcome = result?;
        self.output_message(&summary(&request, &outcome, start));
        Ok(())
    }

    /// Collect every request in a JSON file
    async fn collect_batch(
        &self,
        config: &CollectorConfig,
        input: &Path,
        concurrency: usize,
    ) -> Result<()> {
        let content = std::fs::read_to_string(input)
            .with_context(|| format!("reading {}", input.display()))?;
        let requests: Vec<CollectionRequest> = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", input.display()))?;

        info!(requests = requests.len(), concurrency, "Starting batch");
        let collector = self.build_collector(config).await?;
        let start = Instant::now();

        let results = collector.process_all(&requests, concurrency).await;
        collector.finish().await?;

        let mut failed = 0;
        for (request, result) in requests.iter().zip(&results) {
            match result {
                Ok(outcome) => self.output_message(&summary(request, outcome, start)),
                Err(e) => {
                    failed += 1;
                    self.output_message(&json!({
                        "type": "FAILED",
                        "point_type": request.point_type,
                        "scope": request.scope_name,
                        "url": request.url,
                        "error": e.to_string(),
                    }));
                }
            }
        }

        if failed > 0 {
            return Err(Error::Other(format!(
                "{failed} of {} requests failed",
                requests.len()
            )));
        }
        Ok(())
    }

    /// Show or clear the completion cache
    async fn cache(&self, config: &CollectorConfig, action: CacheAction) -> Result<()> {
        let Some(path) = &config.cache.path else {
            return Err(Error::config(
                "No cache file configured (use --cache or cache.path)",
            ));
        };
        let store = FileCacheStore::open(path).await?;

        match action {
            CacheAction::Show => {
                for record in store.records().await? {
                    self.output_message(&serde_json::to_value(&record)?);
                }
            }
            CacheAction::Clear => {
                let removed = store.len().await?;
                store.clear().await?;
                info!(removed, path = %path.display(), "Cache cleared");
            }
        }
        Ok(())
    }

    /// Wire the transport, cache, sinks and cancellation into a collector
    pub async fn build_collector(&self, config: &CollectorConfig) -> Result<PointCollector> {
        let auth = self.authenticator();
        let authenticated = !matches!(auth.config(), AuthConfig::None);
        info!(identity = auth.identity(), "Using credentials");

        let client = GitHubHttpClient::with_config(config.http_client_config(authenticated))?;

        let store: Arc<dyn CacheStore> = match &config.cache.path {
            Some(path) => Arc::new(FileCacheStore::open(path).await?),
            None => Arc::new(MemoryCacheStore::new()),
        };

        let sink: Arc<dyn RecordSink> = match &config.output.directory {
            Some(dir) => Arc::new(JsonLinesSink::new(dir)),
            None => Arc::new(StdoutSink::new()),
        };

        let mut collector = PointCollector::new(Arc::new(client), CacheGate::new(store))
            .with_auth(Arc::new(auth))
            .with_sink(sink)
            .with_cancellation(cancel_on_ctrl_c());

        for (api_name, signatures) in config.allowlist_signatures()? {
            collector = collector.with_allowlist(api_name, signatures);
        }
        for (api_name, strategy) in &config.pagination {
            collector = collector.with_strategy(api_name.clone(), strategy.clone());
        }

        Ok(collector)
    }

    /// Output a JSON message on stderr, keeping stdout for records
    fn output_message(&self, msg: &Value) {
        if self.cli.verbose {
            eprintln!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
        } else {
            eprintln!("{}", serde_json::to_string(msg).unwrap_or_default());
        }
    }
}

/// A watch flag that turns true on Ctrl-C
fn cancel_on_ctrl_c() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current page");
            let _ = tx.send(true);
        }
    });
    rx
}

fn summary(request: &CollectionRequest, outcome: &CollectionOutcome, start: Instant) -> Value {
    let mut msg = json!({
        "point_type": request.point_type,
        "scope": request.scope_name,
        "url": request.url,
        "elapsed_ms": start.elapsed().as_millis() as u64,
    });
    match outcome {
        CollectionOutcome::Skipped => {
            msg["type"] = json!("SKIPPED");
        }
        CollectionOutcome::Collected(stats) => {
            msg["type"] = json!("COLLECTED");
            msg["pages"] = json!(stats.pages_fetched);
            msg["records"] = json!(stats.records_emitted);
            msg["allowlisted_pages"] = json!(stats.allowlisted_pages);
        }
    }
    msg
}
