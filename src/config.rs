//! Collector configuration
//!
//! Loaded from a YAML or JSON file chosen by extension. Every section has
//! defaults, so an empty file (or no file at all) is a valid configuration.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, HttpResponseSignature, RateLimiterConfig, DEFAULT_API_DOMAIN};
use crate::pagination::CursorStrategy;
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete collector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// GitHub API domain (`api.github.com`, a GHES host, or a full base URL)
    #[serde(default = "default_api_domain")]
    pub api_domain: String,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Completion cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Record output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Non-success responses accepted per API name
    #[serde(default)]
    pub allowlisted_responses: HashMap<String, Vec<AllowlistedResponse>>,

    /// Cursor strategy per API name (default: `Link` header)
    #[serde(default)]
    pub pagination: HashMap<String, CursorStrategy>,

    /// Requests processed at once by `collect-batch`
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            api_domain: default_api_domain(),
            http: HttpConfig::default(),
            cache: CacheConfig::default(),
            output: OutputConfig::default(),
            allowlisted_responses: HashMap::new(),
            pagination: HashMap::new(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_api_domain() -> String {
    DEFAULT_API_DOMAIN.to_string()
}

fn default_concurrency() -> usize {
    4
}

impl CollectorConfig {
    /// Load a config file, YAML or JSON by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&content)?,
            other => {
                return Err(Error::config(format!(
                    "Unsupported config extension {:?} for {}",
                    other.unwrap_or(""),
                    path.display()
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check values that parse but cannot work
    pub fn validate(&self) -> Result<()> {
        if self.api_domain.trim().is_empty() {
            return Err(Error::invalid_value("api_domain", "must not be empty"));
        }
        if self.http.timeout_seconds == 0 {
            return Err(Error::invalid_value("http.timeout_seconds", "must be positive"));
        }
        if self.http.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "http.requests_per_second",
                "must be positive",
            ));
        }
        if self.concurrency == 0 {
            return Err(Error::invalid_value("concurrency", "must be positive"));
        }
        url::Url::parse(&self.base_url())?;
        self.allowlist_signatures()?;
        Ok(())
    }

    /// Base URL derived from `api_domain`
    pub fn base_url(&self) -> String {
        let domain = self.api_domain.trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        }
    }

    /// Build the HTTP client configuration.
    ///
    /// Without an explicit rate, GitHub's budget for the auth mode is used.
    pub fn http_client_config(&self, authenticated: bool) -> HttpClientConfig {
        let rate_limit = match self.http.requests_per_second {
            Some(rps) => RateLimiterConfig::per_second(rps, self.http.burst_size.unwrap_or(rps)),
            None if authenticated => RateLimiterConfig::github_authenticated(),
            None => RateLimiterConfig::github_anonymous(),
        };

        HttpClientConfig::builder()
            .base_url(self.base_url())
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_secs(self.http.max_backoff_seconds),
            )
            .rate_limit(rate_limit)
            .build()
    }

    /// Compile the allowlisted responses into signatures
    pub fn allowlist_signatures(&self) -> Result<HashMap<String, Vec<HttpResponseSignature>>> {
        self.allowlisted_responses
            .iter()
            .map(|(api_name, entries)| {
                let signatures = entries
                    .iter()
                    .map(AllowlistedResponse::signature)
                    .collect::<Result<Vec<_>>>()?;
                Ok((api_name.clone(), signatures))
            })
            .collect()
    }
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First retry delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Retry delay cap in seconds
    #[serde(default = "default_max_backoff_seconds")]
    pub max_backoff_seconds: u64,

    /// Backoff curve
    #[serde(default)]
    pub backoff: BackoffType,

    /// Request rate; GitHub's budget when omitted
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    /// Burst size; equals the rate when omitted
    #[serde(default)]
    pub burst_size: Option<u32>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_seconds: default_max_backoff_seconds(),
            backoff: BackoffType::default(),
            requests_per_second: None,
            burst_size: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_seconds() -> u64 {
    60
}

/// Completion cache settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache file; in-memory when omitted
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Record output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for `.jsonl` files; stdout when omitted
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// One accepted non-success response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowlistedResponse {
    /// HTTP status code
    pub status: u16,
    /// Regex the body must match; any body when omitted
    #[serde(default)]
    pub body_pattern: Option<String>,
}

impl AllowlistedResponse {
    /// Compile into a response signature
    pub fn signature(&self) -> Result<HttpResponseSignature> {
        match &self.body_pattern {
            Some(pattern) => HttpResponseSignature::with_pattern(self.status, pattern),
            None => Ok(HttpResponseSignature::new(self.status)),
        }
    }
}
