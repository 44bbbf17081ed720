//! Rate limiting implementation
//!
//! Uses the governor crate for token bucket rate limiting. GitHub budgets
//! requests per hour, so the quota is expressed as `requests` per `period`.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Number of requests allowed per period
    pub requests: u32,
    /// Length of the period
    pub period: Duration,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::per_second(10, 10)
    }
}

impl RateLimiterConfig {
    /// Create a per-second rate limiter config
    pub fn per_second(requests: u32, burst_size: u32) -> Self {
        Self {
            requests,
            period: Duration::from_secs(1),
            burst_size,
        }
    }

    /// Authenticated GitHub REST budget (5000 requests per hour)
    pub fn github_authenticated() -> Self {
        Self {
            requests: 5000,
            period: Duration::from_secs(3600),
            burst_size: 100,
        }
    }

    /// Anonymous GitHub REST budget (60 requests per hour)
    pub fn github_anonymous() -> Self {
        Self {
            requests: 60,
            period: Duration::from_secs(3600),
            burst_size: 10,
        }
    }

    /// Time between replenished tokens
    pub fn replenish_interval(&self) -> Duration {
        self.period / self.requests.max(1)
    }

    fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(self.replenish_interval())
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst)
    }
}

/// Token bucket rate limiter shared by every request of one client
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            limiter: Arc::new(Governor::direct(config.quota())),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}
