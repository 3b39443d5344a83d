//! Configuration loader with layered sources.

use crate::AppConfig;
use aside_core::{AsideError, AsideResult};
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable selecting the `config/{environment}.toml` overlay.
pub const ENVIRONMENT_VAR: &str = "ASIDE_ENVIRONMENT";

/// Prefix for environment variable overrides (`ASIDE__DATABASE__URL`).
pub const ENV_PREFIX: &str = "ASIDE";

/// Loads [`AppConfig`] from layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a loader reading files from `config_dir`.
    ///
    /// Sources are applied in order, later ones overriding earlier ones:
    /// 1. `default.toml`
    /// 2. `{environment}.toml`
    /// 3. `local.toml` (not committed to version control)
    /// 4. Environment variables with the `ASIDE__` prefix
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> AsideResult<AppConfig> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();
        for name in ["default", environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{}.toml", name));
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path.as_path()).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_error_to_aside_error)?;

        validate_config(&app_config)?;
        Ok(app_config)
    }

    /// Directory the loader reads from.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Validates the configuration.
pub fn validate_config(config: &AppConfig) -> AsideResult<()> {
    if config.database.url.trim().is_empty() {
        return Err(AsideError::Configuration("Database URL is required".to_string()));
    }

    if config.timeouts.store_ms == 0 || config.timeouts.cache_ms == 0 {
        return Err(AsideError::Configuration(
            "Store and cache timeouts must be greater than zero".to_string(),
        ));
    }

    if config.database.max_connections == 0 {
        return Err(AsideError::Configuration(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if config.timeouts.cache_ms >= config.timeouts.store_ms {
        warn!(
            cache_ms = config.timeouts.cache_ms,
            store_ms = config.timeouts.store_ms,
            "Cache timeout is not shorter than the store timeout; a slow cache will dominate read latency"
        );
    }

    Ok(())
}

fn config_error_to_aside_error(err: ConfigError) -> AsideError {
    AsideError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheBackend, ServerConfig};
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.timeouts.store_ms, 5_000);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_load_layers_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
            [server]
            port = 9000

            [database]
            url = "sqlite::memory:"

            [cache]
            backend = "memory"
            "#,
        )
        .unwrap();
        fs::write(
            dir.path().join("local.toml"),
            r#"
            [timeouts]
            store_ms = 1500
            "#,
        )
        .unwrap();

        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.timeouts.store_ms, 1500);
        // Untouched fields keep their defaults.
        assert_eq!(config.timeouts.cache_ms, 250);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_missing_directory_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path().join("nope"));
        let config = loader.load().unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_rejects_empty_database_url() {
        let mut config = AppConfig::default();
        config.database.url = "  ".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(AsideError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_zero_timeouts() {
        let mut config = AppConfig::default();
        config.timeouts.cache_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_duration_helpers() {
        let config = AppConfig::default();
        assert_eq!(config.timeouts.cache(), std::time::Duration::from_millis(250));
        assert_eq!(config.server.request_timeout(), std::time::Duration::from_secs(30));
        assert!(!config.observability.json_logs());
    }
}
