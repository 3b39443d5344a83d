//! Main application router.

use crate::{
    controllers::{
        health_controller, metrics_controller, metrics_controller::MetricsEndpoint, user_controller,
    },
    middleware::logging_middleware,
    state::AppState,
};
use crate::responses::AppError;
use aside_config::ServerConfig;
use aside_core::AsideError;
use axum::{error_handling::HandleErrorLayer, middleware, BoxError, Router};
use std::time::Duration;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Renders a failure from the timeout layer as a JSON error.
fn request_deadline_error(err: &BoxError, limit: Duration) -> AppError {
    if err.is::<Elapsed>() {
        AppError(AsideError::Timeout(format!("request timed out after {:?}", limit)))
    } else {
        AppError(AsideError::internal(err.to_string()))
    }
}

/// Creates the main application router.
///
/// The metrics route is mounted only when an endpoint is given.
pub fn create_router(
    state: AppState,
    server_config: &ServerConfig,
    metrics: Option<MetricsEndpoint>,
) -> Router {
    let mut routes = Router::new()
        .merge(health_controller::router())
        .merge(user_controller::router());

    if let Some(endpoint) = metrics {
        info!("Serving Prometheus metrics at {}", endpoint.path);
        routes = routes.merge(metrics_controller::router(endpoint));
    }

    let limit = server_config.request_timeout();
    let deadline = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(move |err: BoxError| async move {
            request_deadline_error(&err, limit)
        }))
        .timeout(limit);

    let router = routes
        .with_state(state)
        .layer(deadline)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with user, health and metrics endpoints");
    router
}
