//! Repository trait definitions.

use aside_core::{AsideResult, UserId};
use async_trait::async_trait;

/// Origin store for user records.
///
/// The store is the source of truth; identifiers are assigned by it on
/// insert and never change.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user and returns the identifier the store assigned.
    async fn create(&self, name: &str) -> AsideResult<UserId>;

    /// Looks up the name stored for `id`.
    ///
    /// Returns [`AsideError::NotFound`](aside_core::AsideError::NotFound)
    /// when no row matches, including identifiers that are not integers.
    async fn find_name_by_id(&self, id: &str) -> AsideResult<String>;
}
