//! Auth configuration types

use crate::error::Result;
use async_trait::async_trait;
use reqwest::RequestBuilder;

/// Authentication collaborator consumed by the transport and the cursors.
///
/// `identity` is opaque bookkeeping: cursors record it as the identity that
/// fetched the previous page and never interpret it.
#[async_trait]
pub trait Authentication: Send + Sync {
    /// Identity of the credentials (never the secret itself)
    fn identity(&self) -> &str;

    /// Apply the credentials to an outgoing request
    async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder>;
}

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// Unauthenticated requests (subject to the low anonymous rate limit)
    #[default]
    None,

    /// Personal access token or installation token, sent as a bearer token
    Token {
        /// The token value
        token: String,
    },

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password or token
        password: String,
    },
}

impl AuthConfig {
    /// Token auth, or anonymous when the token is empty
    pub fn token(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.is_empty() {
            Self::None
        } else {
            Self::Token { token }
        }
    }

    /// Derive a printable identity that does not leak the secret
    pub fn default_identity(&self) -> String {
        match self {
            AuthConfig::None => "anonymous".to_string(),
            AuthConfig::Token { token } => {
                let tail: String = token
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("token:...{tail}")
            }
            AuthConfig::Basic { username, .. } => format!("basic:{username}"),
        }
    }
}
