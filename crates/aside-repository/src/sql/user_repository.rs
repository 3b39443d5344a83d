//! SQL user repository implementation.

use crate::{pool::Dialect, traits::UserRepository, DatabasePool};
use aside_core::{AsideError, AsideResult, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// User repository backed by the `users` table.
#[derive(Clone, Debug)]
pub struct SqlUserRepository {
    pool: Arc<DatabasePool>,
}

impl SqlUserRepository {
    /// Creates a new SQL user repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn create(&self, name: &str) -> AsideResult<UserId> {
        debug!("Inserting user: {}", name);

        let id = match self.pool.dialect() {
            // The SQLite driver reports no insert id through `Any`.
            Dialect::Sqlite => {
                sqlx::query_scalar::<_, i64>("INSERT INTO users (name) VALUES (?) RETURNING id")
                    .bind(name)
                    .fetch_one(self.pool.inner())
                    .await?
            }
            Dialect::MySql => {
                let result = sqlx::query("INSERT INTO users (name) VALUES (?)")
                    .bind(name)
                    .execute(self.pool.inner())
                    .await?;

                result.last_insert_id().ok_or_else(|| {
                    AsideError::Database("Store did not report an inserted id".to_string())
                })?
            }
        };

        debug!("Inserted user {} as id {}", name, id);
        Ok(UserId::new(id))
    }

    async fn find_name_by_id(&self, id: &str) -> AsideResult<String> {
        debug!("Finding user by id: {}", id);

        let Ok(user_id) = UserId::parse(id) else {
            debug!("Identifier '{}' is not an integer; no row can match", id);
            return Err(AsideError::not_found("User", id));
        };

        let name: Option<String> = sqlx::query_scalar("SELECT name FROM users WHERE id = ?")
            .bind(user_id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        name.ok_or_else(|| AsideError::not_found("User", id))
    }
}
