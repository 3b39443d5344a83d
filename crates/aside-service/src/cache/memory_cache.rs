//! In-process TTL cache.

use super::CacheInterface;
use aside_core::AsideResult;
use async_trait::async_trait;
use moka::{future::Cache, Expiry};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Upper bound on resident entries when none is given.
const DEFAULT_CAPACITY: u64 = 100_000;

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
    expires_at: Instant,
}

/// Evicts each entry once its own TTL has elapsed.
struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: std::time::Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Cache held in process memory.
///
/// Storage is a bounded `moka` cache that evicts entries when their TTL
/// elapses. Reads also check the deadline on tokio's clock, so paused-time
/// tests can step through expiry.
pub struct MemoryCacheService {
    entries: Cache<String, Entry>,
}

impl MemoryCacheService {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a cache holding at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .expire_after(EntryTtl)
            .build();
        Self { entries }
    }

    /// Number of resident entries once pending evictions have run.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryCacheService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheInterface for MemoryCacheService {
    fn is_enabled(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> AsideResult<Option<String>> {
        let value = match self.entries.get(key).await {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value),
            Some(_) => {
                self.entries.invalidate(key).await;
                debug!("Cache entry '{}' expired", key);
                None
            }
            None => None,
        };

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AsideResult<()> {
        let entry = Entry {
            value: value.to_string(),
            ttl,
            expires_at: Instant::now() + ttl,
        };
        self.entries.insert(key.to_string(), entry).await;

        debug!("Cached key '{}' with TTL {:?}", key, ttl);
        Ok(())
    }

    async fn ping(&self) -> AsideResult<()> {
        Ok(())
    }
}

impl std::fmt::Debug for MemoryCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheService")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
