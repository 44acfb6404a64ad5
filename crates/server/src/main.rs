//! Cost optimizer service
//!
//! Loads an instance catalog once at startup and answers optimization
//! requests over HTTP.

use anyhow::{Context, Result};
use optimizer_lib::{Catalog, OptimizerMetrics, ScalingAnalyzer, StructuredLogger};
use optimizer_server::{api, config::ServerConfig};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting cost-optimizer");

    let config = ServerConfig::load()?;
    info!(
        service = %config.service_name,
        catalog_path = %config.catalog_path,
        "Service configured"
    );

    let logger = StructuredLogger::new(&config.service_name);

    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog {}", config.catalog_path))?;
    logger.log_catalog_loaded(&config.catalog_path, catalog.len(), &catalog.fingerprint());

    let metrics = OptimizerMetrics::new();
    let analyzer = ScalingAnalyzer::new(config.analyzer_config())
        .with_metrics(metrics.clone())
        .with_logger(logger.clone());

    let app_state = Arc::new(api::AppState::new(
        catalog,
        analyzer,
        metrics,
        config.run_timeout(),
    ));

    logger.log_startup(SERVICE_VERSION, config.api_port);

    tokio::select! {
        result = api::serve(config.api_port, app_state) => {
            if let Err(e) = result {
                error!(error = %e, "API server exited");
                logger.log_shutdown("server error");
                return Err(e);
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
