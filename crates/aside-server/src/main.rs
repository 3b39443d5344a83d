//! # Aside Server
//!
//! Entry point: loads configuration, wires the store, cache and HTTP
//! layers, and serves until Ctrl+C or SIGTERM.

use aside_config::{AppConfig, ConfigLoader};
use aside_core::AsideResult;
use aside_server::{
    app::AppBuilder,
    startup::{init_logging, install_metrics, print_banner, shutdown_signal},
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location().load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);
    print_banner();

    info!("Starting Aside server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> AsideResult<()> {
    let mut builder = AppBuilder::new();
    if config.observability.metrics_enabled {
        builder = builder.with_metrics(install_metrics()?);
    }

    let app = builder.with_config(config).build().await?;
    app.run(shutdown_signal()).await
}
