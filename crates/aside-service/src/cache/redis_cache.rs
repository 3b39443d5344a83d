//! Redis-based cache implementation.

use super::CacheInterface;
use aside_config::CacheConfig;
use aside_core::{AsideError, AsideResult};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool, PoolConfig, Runtime};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Whole seconds for `SET EX`: rounded up, and never below one.
fn expiry_secs(ttl: Duration) -> u64 {
    (ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0)).max(1)
}

/// Redis-based cache service.
#[derive(Clone)]
pub struct RedisCacheService {
    /// Redis connection pool; `None` when caching is disabled.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Builds the connection pool described by `config`.
    ///
    /// No connection is opened here, so an unreachable Redis does not stop
    /// the process from starting.
    pub fn from_config(config: &CacheConfig) -> AsideResult<Self> {
        let mut redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
        redis_cfg.pool = Some(PoolConfig::new(config.pool_size.max(1)));

        let pool = redis_cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| AsideError::Cache(format!("Failed to create Redis pool: {}", e)))?;

        Ok(Self::new(Arc::new(pool)))
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> AsideResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                AsideError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(AsideError::Cache("Cache is disabled".to_string())),
        }
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    fn backend(&self) -> &'static str {
        if self.is_enabled() {
            "redis"
        } else {
            "disabled"
        }
    }

    async fn get(&self, key: &str) -> AsideResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            AsideError::Cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AsideResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = expiry_secs(ttl);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await.map_err(|e| {
            AsideError::Cache(format!("Failed to set key '{}': {}", key, e))
        })?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn ping(&self) -> AsideResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let pong: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| AsideError::Cache(format!("PING failed: {}", e)))?;

        debug!("Redis answered {}", pong);
        Ok(())
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> CacheConfig {
        CacheConfig {
            // Port 1 is reserved; connections are refused immediately.
            redis_url: "redis://127.0.0.1:1".to_string(),
            pool_size: 2,
            ..CacheConfig::default()
        }
    }

    #[test]
    fn test_expiry_rounds_up_to_whole_seconds() {
        assert_eq!(expiry_secs(Duration::from_secs(60)), 60);
        assert_eq!(expiry_secs(Duration::from_millis(1_500)), 2);
        assert_eq!(expiry_secs(Duration::from_millis(200)), 1);
        assert_eq!(expiry_secs(Duration::ZERO), 1);
    }

    #[test]
    fn test_disabled_cache() {
        let cache = RedisCacheService::disabled();
        assert!(!cache.is_enabled());
        assert_eq!(cache.backend(), "disabled");
    }

    #[tokio::test]
    async fn test_disabled_cache_always_misses() {
        let cache = RedisCacheService::disabled();
        cache.set("user:1", "alice", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("user:1").await.unwrap(), None);
        assert!(cache.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_pool_creation_is_lazy() {
        let cache = RedisCacheService::from_config(&unreachable_config()).unwrap();
        assert!(cache.is_enabled());
        assert_eq!(cache.backend(), "redis");
    }

    #[tokio::test]
    async fn test_unreachable_redis_reports_cache_errors() {
        let cache = RedisCacheService::from_config(&unreachable_config()).unwrap();

        assert!(matches!(cache.get("user:1").await, Err(AsideError::Cache(_))));
        assert!(matches!(
            cache.set("user:1", "alice", Duration::from_secs(60)).await,
            Err(AsideError::Cache(_))
        ));
        assert!(matches!(cache.ping().await, Err(AsideError::Cache(_))));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let config = CacheConfig {
            redis_url: "not a url".to_string(),
            ..CacheConfig::default()
        };
        assert!(matches!(
            RedisCacheService::from_config(&config),
            Err(AsideError::Cache(_))
        ));
    }
}
