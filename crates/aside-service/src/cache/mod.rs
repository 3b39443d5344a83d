//! Caching infrastructure for the service layer.
//!
//! [`CacheInterface`] abstracts the key-value store the accessor consults
//! before the origin store. Redis is the shared backend; the in-process
//! backend serves local development and tests.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use cache_interface::{CacheInterface, CacheProbe};
pub use memory_cache::MemoryCacheService;
pub use redis_cache::RedisCacheService;
