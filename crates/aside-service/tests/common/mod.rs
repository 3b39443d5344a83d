//! Redis testcontainer harness for cache integration tests.

use aside_config::{CacheBackend, CacheConfig};
use aside_service::{CacheInterface, RedisCacheService};
use std::time::Duration;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::redis::Redis;

/// A throwaway Redis server and a cache pointed at it.
pub struct TestRedis {
    _container: ContainerAsync<Redis>,
    cache: RedisCacheService,
}

impl TestRedis {
    /// Starts Redis and waits until it answers `PING`.
    pub async fn new() -> Self {
        let container = Redis::default()
            .start()
            .await
            .expect("Failed to start Redis container");

        let port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Failed to get Redis port");

        let config = CacheConfig {
            backend: CacheBackend::Redis,
            redis_url: format!("redis://127.0.0.1:{}", port),
            pool_size: 4,
        };
        let cache = RedisCacheService::from_config(&config).expect("Failed to build Redis pool");
        Self::wait_until_ready(&cache, 30).await;

        Self {
            _container: container,
            cache,
        }
    }

    /// Returns a cache client sharing the server's pool.
    pub fn cache(&self) -> RedisCacheService {
        self.cache.clone()
    }

    async fn wait_until_ready(cache: &RedisCacheService, max_attempts: u32) {
        for attempt in 1..=max_attempts {
            match cache.ping().await {
                Ok(()) => return,
                Err(e) if attempt == max_attempts => {
                    panic!("Redis not ready after {} attempts: {}", max_attempts, e)
                }
                Err(_) => tokio::time::sleep(Duration::from_millis(500)).await,
            }
        }
    }
}
