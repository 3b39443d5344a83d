//! Prometheus scrape endpoint.

use crate::state::AppState;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;

/// Where and from what recorder metrics are served.
#[derive(Clone)]
pub struct MetricsEndpoint {
    pub path: String,
    pub handle: PrometheusHandle,
}

impl MetricsEndpoint {
    pub fn new(path: impl Into<String>, handle: PrometheusHandle) -> Self {
        Self {
            path: path.into(),
            handle,
        }
    }
}

/// Creates the metrics router.
pub fn router(endpoint: MetricsEndpoint) -> Router<AppState> {
    let handle = endpoint.handle;
    Router::new().route(
        &endpoint.path,
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    )
}
