//! Authenticator implementation
//!
//! Handles applying authentication to requests.

use super::types::{AuthConfig, Authentication};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Clone)]
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Identity reported to cursors
    identity: String,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        let identity = config.default_identity();
        Self { config, identity }
    }

    /// Create an anonymous authenticator
    pub fn anonymous() -> Self {
        Self::new(AuthConfig::None)
    }

    /// Override the reported identity (e.g. an app or account name)
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    /// Get the auth configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

#[async_trait]
impl Authentication for Authenticator {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Ok(req),
            AuthConfig::Token { token } => Ok(req.bearer_auth(token)),
            AuthConfig::Basic { username, password } => {
                Ok(req.basic_auth(username, Some(password)))
            }
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
