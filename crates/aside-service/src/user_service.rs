//! User service trait definition.

use aside_core::{AsideResult, UserId};
use async_trait::async_trait;

/// Read and write access to users.
///
/// Reads go through the cache; writes go straight to the origin store.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Inserts a user and returns the id the store assigned.
    async fn add_user(&self, name: &str) -> AsideResult<UserId>;

    /// Returns the name stored under `id`.
    ///
    /// `id` is the raw identifier from the caller. A cached value is
    /// returned without checking the store, so it may be up to one TTL
    /// stale.
    async fn get_user_name(&self, id: &str) -> AsideResult<String>;
}
