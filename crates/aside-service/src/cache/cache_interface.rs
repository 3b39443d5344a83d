//! Cache interface trait for abstracted caching operations.

use aside_core::{AsideResult, HealthCheck, HealthStatus};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Cache interface for storing and retrieving string values with a TTL.
///
/// Implementations report failures as [`AsideError::Cache`]; deciding
/// what a failure means is left to the caller.
///
/// [`AsideError::Cache`]: aside_core::AsideError::Cache
#[async_trait]
pub trait CacheInterface: Send + Sync {
    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get(&self, key: &str) -> AsideResult<Option<String>>;

    /// Set a value in the cache. The entry is treated as absent once `ttl`
    /// has elapsed.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AsideResult<()>;

    /// Round-trips to the backend.
    async fn ping(&self) -> AsideResult<()>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Adapts any cache into a [`HealthCheck`].
///
/// A disabled cache reports as degraded rather than unhealthy.
#[derive(Clone)]
pub struct CacheProbe {
    cache: Arc<dyn CacheInterface>,
}

impl CacheProbe {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl HealthCheck for CacheProbe {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        if !self.cache.is_enabled() {
            return HealthStatus::Degraded(format!("{} cache is disabled", self.cache.backend()));
        }

        match self.cache.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}
