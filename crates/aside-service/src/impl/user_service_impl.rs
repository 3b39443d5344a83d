//! Cache-aside user service.

use crate::cache::{cache_keys, CacheInterface};
use crate::metrics::{CacheMetrics, CacheOperation, StoreMetrics};
use crate::user_service::UserService;
use aside_config::TimeoutConfig;
use aside_core::{with_timeout, AsideError, AsideResult, UserId};
use aside_repository::UserRepository;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Lifetime of a cached user name.
pub const USER_TTL: Duration = Duration::from_secs(60);

/// Tuning for [`UserServiceImpl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessConfig {
    /// Expiry applied to every populated entry.
    pub ttl: Duration,
    /// Deadline for each store call.
    pub store_timeout: Duration,
    /// Deadline for each cache call. Exceeding it counts as a miss.
    pub cache_timeout: Duration,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self::from_timeouts(&TimeoutConfig::default())
    }
}

impl AccessConfig {
    #[must_use]
    pub const fn from_timeouts(timeouts: &TimeoutConfig) -> Self {
        Self {
            ttl: USER_TTL,
            store_timeout: timeouts.store(),
            cache_timeout: timeouts.cache(),
        }
    }
}

/// Reads users through the cache, writes them straight to the store.
///
/// Entries are never invalidated; a name changed in the store becomes
/// visible once the cached copy expires. Concurrent misses for one id each
/// go to the store.
pub struct UserServiceImpl {
    repository: Arc<dyn UserRepository>,
    cache: Arc<dyn CacheInterface>,
    config: AccessConfig,
}

impl UserServiceImpl {
    /// Creates a new user service.
    pub fn new(
        repository: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheInterface>,
        config: AccessConfig,
    ) -> Self {
        Self {
            repository,
            cache,
            config,
        }
    }

    /// Cache lookup where any failure reads as a miss.
    async fn cached(&self, key: &str) -> Option<String> {
        match with_timeout(self.config.cache_timeout, "cache get", self.cache.get(key)).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, falling back to store");
                CacheMetrics::error(CacheOperation::Get);
                None
            }
        }
    }

    /// Best-effort cache fill.
    async fn populate(&self, key: &str, name: &str) {
        let write = self.cache.set(key, name, self.config.ttl);
        match with_timeout(self.config.cache_timeout, "cache set", write).await {
            Ok(()) => debug!(key, ttl = ?self.config.ttl, "Cache populated"),
            Err(e) => {
                warn!(key, error = %e, "Cache populate failed");
                CacheMetrics::error(CacheOperation::Set);
            }
        }
    }
}

const fn lookup_outcome(error: &AsideError) -> &'static str {
    match error {
        AsideError::NotFound { .. } => "not_found",
        AsideError::Timeout(_) => "timeout",
        _ => "error",
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn add_user(&self, name: &str) -> AsideResult<UserId> {
        debug!("Adding user: {}", name);

        // An abandoned insert may still commit, so its timeout is not retryable.
        let id = with_timeout(
            self.config.store_timeout,
            "store insert",
            self.repository.create(name),
        )
        .await
        .map_err(|e| match e {
            AsideError::Timeout(msg) => {
                AsideError::Database(format!("Insert outcome unknown: {}", msg))
            }
            other => other,
        })?;

        info!("User added: {}", id);
        Ok(id)
    }

    async fn get_user_name(&self, id: &str) -> AsideResult<String> {
        let key = cache_keys::user_by_id(id);

        if let Some(name) = self.cached(&key).await {
            CacheMetrics::hit();
            return Ok(name);
        }
        CacheMetrics::miss();

        let lookup = with_timeout(
            self.config.store_timeout,
            "store lookup",
            self.repository.find_name_by_id(id),
        )
        .await;

        let name = match lookup {
            Ok(name) => {
                StoreMetrics::lookup("found");
                name
            }
            Err(e) => {
                StoreMetrics::lookup(lookup_outcome(&e));
                if !e.is_not_found() {
                    warn!(id, error = %e, "Store lookup failed");
                }
                return Err(e);
            }
        };

        self.populate(&key, &name).await;
        Ok(name)
    }
}
