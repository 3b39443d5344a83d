//! Application builder.

use crate::startup::print_startup_info;
use aside_config::{AppConfig, CacheBackend, CacheConfig};
use aside_core::{AsideError, AsideResult};
use aside_repository::{create_pool, DatabasePool, SqlUserRepository, UserRepository};
use aside_rest::{controllers::metrics_controller::MetricsEndpoint, create_router, AppState};
use aside_service::{
    AccessConfig, CacheInterface, CacheProbe, MemoryCacheService, RedisCacheService,
    UserServiceImpl,
};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Builds the cache backend selected in configuration.
pub fn build_cache(config: &CacheConfig) -> AsideResult<Arc<dyn CacheInterface>> {
    let cache: Arc<dyn CacheInterface> = match config.backend {
        CacheBackend::Redis => Arc::new(RedisCacheService::from_config(config)?),
        CacheBackend::Memory => Arc::new(MemoryCacheService::new()),
        CacheBackend::Disabled => Arc::new(RedisCacheService::disabled()),
    };

    info!(backend = cache.backend(), "Cache backend ready");
    Ok(cache)
}

/// Application builder for constructing the server.
pub struct AppBuilder {
    config: Option<AppConfig>,
    metrics: Option<PrometheusHandle>,
}

impl AppBuilder {
    /// Creates a new application builder.
    pub fn new() -> Self {
        Self {
            config: None,
            metrics: None,
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Serves metrics from `handle` when metrics are enabled.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Connects to the store, builds the cache and wires the router.
    pub async fn build(self) -> AsideResult<Application> {
        let config = self.config.unwrap_or_default();

        let pool = create_pool(&config.database).await?;
        pool.ensure_schema().await?;

        let repository: Arc<dyn UserRepository> = Arc::new(SqlUserRepository::new(pool.clone()));
        let cache = build_cache(&config.cache)?;
        let user_service = Arc::new(UserServiceImpl::new(
            repository,
            cache.clone(),
            AccessConfig::from_timeouts(&config.timeouts),
        ));

        let state = AppState::new(user_service, pool.clone(), Arc::new(CacheProbe::new(cache)));

        let metrics = self
            .metrics
            .filter(|_| config.observability.metrics_enabled)
            .map(|handle| MetricsEndpoint::new(config.observability.metrics_path.clone(), handle));

        let router = create_router(state, &config.server, metrics);

        Ok(Application {
            config,
            pool,
            router,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully wired server, ready to accept connections.
pub struct Application {
    config: AppConfig,
    pool: Arc<DatabasePool>,
    router: Router,
}

impl Application {
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> AsideResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.server.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AsideError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener, then closes the store pool.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> AsideResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener
            .local_addr()
            .map_err(|e| AsideError::Internal(format!("Failed to read local address: {}", e)))?;

        let metrics_path = self
            .config
            .observability
            .metrics_enabled
            .then_some(self.config.observability.metrics_path.as_str());
        print_startup_info(local_addr, metrics_path);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| AsideError::Internal(format!("HTTP server error: {}", e)))?;

        self.pool.close().await;
        info!("Server shutdown complete");
        Ok(())
    }
}
