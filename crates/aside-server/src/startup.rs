//! Server startup utilities.

use aside_config::ObservabilityConfig;
use aside_core::{AsideError, AsideResult};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Fallback filter when neither `RUST_LOG` nor the configured level parses.
const DEFAULT_FILTER: &str = "info";

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r#"
    ___              _     __
   /   |  _____(_)___/ /__
  / /| | / ___/ / __  / _ \
 / ___ |(__  ) / /_/ /  __/
/_/  |_/____/_/\__,_/\___/

        cache-aside user service
    "#
    );
}

/// Prints server startup information.
pub fn print_startup_info(addr: SocketAddr, metrics_path: Option<&str>) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Users:     http://{}/add/:name, http://{}/get/:id", addr, addr);
    info!("Health:    http://{}/health", addr);
    info!("Ready:     http://{}/ready", addr);
    if let Some(path) = metrics_path {
        info!("Metrics:   http://{}{}", addr, path);
    }
    info!("{}", separator);
}

/// Builds the log filter. `RUST_LOG` wins over the configured level.
fn log_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let registry = tracing_subscriber::registry().with(log_filter(config));

    if config.json_logs() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Installs the global Prometheus recorder and describes every metric.
pub fn install_metrics() -> AsideResult<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AsideError::Internal(format!("Failed to install metrics recorder: {}", e)))?;

    aside_service::register_metrics();
    Ok(handle)
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        print_startup_info(addr, Some("/metrics"));
        print_startup_info(addr, None);
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let config = ObservabilityConfig {
            log_level: "not[a=filter".to_string(),
            ..ObservabilityConfig::default()
        };
        // Either RUST_LOG or the fallback; must not panic.
        let _ = log_filter(&config);
    }
}
