//! Database connection pool management.

use aside_config::DatabaseConfig;
use aside_core::{AsideError, AsideResult, HealthCheck, HealthStatus};
use async_trait::async_trait;
use sqlx::{any::AnyPoolOptions, AnyPool};
use std::sync::Arc;
use tracing::{info, warn};

const MYSQL_USERS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGINT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL
    )
"#;

const SQLITE_USERS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(255) NOT NULL
    )
"#;

/// SQL dialect of the configured origin store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    /// Infers the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> AsideResult<Self> {
        let scheme = url.split(':').next().unwrap_or_default().to_ascii_lowercase();
        match scheme.as_str() {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(AsideError::Configuration(format!(
                "Unsupported database scheme '{}'",
                other
            ))),
        }
    }

    const fn users_ddl(self) -> &'static str {
        match self {
            Self::MySql => MYSQL_USERS_DDL,
            Self::Sqlite => SQLITE_USERS_DDL,
        }
    }
}

/// Pool settings for `dialect`.
///
/// An in-memory SQLite database lives only as long as its connection, so
/// SQLite connections are never recycled for age or idleness.
fn pool_options(config: &DatabaseConfig, dialect: Dialect) -> AnyPoolOptions {
    let options = AnyPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout());

    match dialect {
        Dialect::MySql => options.idle_timeout(Some(config.idle_timeout())),
        Dialect::Sqlite => options.idle_timeout(None).max_lifetime(None),
    }
}

/// Database pool wrapper.
#[derive(Clone)]
pub struct DatabasePool {
    pool: AnyPool,
    dialect: Dialect,
}

impl DatabasePool {
    /// Creates a new database pool from configuration.
    pub async fn new(config: &DatabaseConfig) -> AsideResult<Self> {
        let dialect = Dialect::from_url(&config.url)?;
        sqlx::any::install_default_drivers();

        info!(?dialect, "Connecting to origin store...");

        let pool = pool_options(config, dialect)
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                AsideError::Database(format!("Failed to connect: {}", e))
            })?;

        info!("Origin store connection pool established");
        Ok(Self { pool, dialect })
    }

    /// Returns a reference to the underlying pool.
    #[must_use]
    pub fn inner(&self) -> &AnyPool {
        &self.pool
    }

    /// Returns the dialect the pool was opened with.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Creates the `users` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> AsideResult<()> {
        sqlx::query(self.dialect.users_ddl())
            .execute(&self.pool)
            .await
            .map_err(|e| AsideError::Database(format!("Failed to create users table: {}", e)))?;
        info!("Users table ready");
        Ok(())
    }

    /// Checks if the database connection is healthy.
    pub async fn health_check(&self) -> AsideResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AsideError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Closes the database pool.
    pub async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[async_trait]
impl HealthCheck for DatabasePool {
    fn name(&self) -> &str {
        "store"
    }

    async fn check(&self) -> HealthStatus {
        match self.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("dialect", &self.dialect)
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

/// Creates a shared database pool.
pub async fn create_pool(config: &DatabaseConfig) -> AsideResult<Arc<DatabasePool>> {
    let pool = DatabasePool::new(config).await?;
    Ok(Arc::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_url() {
        assert_eq!(Dialect::from_url("mysql://u:p@db:3306/app").unwrap(), Dialect::MySql);
        assert_eq!(Dialect::from_url("sqlite::memory:").unwrap(), Dialect::Sqlite);
        assert_eq!(Dialect::from_url("SQLITE://data.db").unwrap(), Dialect::Sqlite);
        assert!(matches!(
            Dialect::from_url("postgres://localhost/app"),
            Err(AsideError::Configuration(_))
        ));
    }

    #[test]
    fn test_sqlite_connections_are_never_recycled() {
        let config = DatabaseConfig::default();

        let sqlite = pool_options(&config, Dialect::Sqlite);
        assert_eq!(sqlite.get_max_lifetime(), None);
        assert_eq!(sqlite.get_idle_timeout(), None);

        let mysql = pool_options(&config, Dialect::MySql);
        assert_eq!(mysql.get_idle_timeout(), Some(config.idle_timeout()));
        assert!(mysql.get_max_lifetime().is_some());
    }

    #[tokio::test]
    async fn test_sqlite_pool_schema_and_health() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            ..DatabaseConfig::default()
        };
        let pool = DatabasePool::new(&config).await.unwrap();
        assert_eq!(pool.dialect(), Dialect::Sqlite);

        pool.ensure_schema().await.unwrap();
        // Idempotent.
        pool.ensure_schema().await.unwrap();
        pool.health_check().await.unwrap();
        assert_eq!(pool.check().await, HealthStatus::Healthy);

        pool.close().await;
        assert!(pool.health_check().await.is_err());
        assert!(pool.check().await.is_unhealthy());
    }

    #[tokio::test]
    async fn test_unsupported_scheme_fails_before_connecting() {
        let config = DatabaseConfig {
            url: "oracle://nowhere".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(matches!(
            DatabasePool::new(&config).await,
            Err(AsideError::Configuration(_))
        ));
    }
}
