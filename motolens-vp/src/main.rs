//! Vehicle-to-Parts resolver (motolens-vp) - Main entry point
//!
//! Backend microservice for the MotoLens mobile app. Decodes a VIN against
//! the external vehicle catalog provider and resolves it down to a grouped
//! OEM parts list.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use motolens_common::config::{load_toml_config, load_toml_config_from};
use motolens_vp::catalog::{CatalogGateway, CatalogPaths, VinPartsPipeline};
use motolens_vp::config::resolve_catalog_api_key;
use motolens_vp::{build_router, AppState};

/// Command-line arguments for motolens-vp
#[derive(Parser, Debug)]
#[command(name = "motolens-vp")]
#[command(about = "Vehicle-to-Parts resolver microservice for MotoLens")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "MOTOLENS_VP_PORT")]
    port: Option<u16>,

    /// Path to the TOML configuration file
    #[arg(short, long, env = "MOTOLENS_VP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "motolens_vp=info,motolens_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting MotoLens Vehicle-to-Parts resolver (motolens-vp) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let toml_config = match &args.config {
        Some(path) => load_toml_config_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => load_toml_config("motolens-vp"),
    };

    let api_key = resolve_catalog_api_key(&toml_config)?;

    let catalog_cfg = &toml_config.catalog;
    let gateway = CatalogGateway::new(
        &catalog_cfg.base_url,
        &catalog_cfg.api_host,
        &api_key,
        Duration::from_secs(catalog_cfg.timeout_seconds),
    )
    .context("Failed to build catalog gateway")?;
    info!(
        "Catalog gateway ready: {} (timeout {}s)",
        catalog_cfg.base_url, catalog_cfg.timeout_seconds
    );

    let paths = CatalogPaths::new(
        catalog_cfg.lang_id,
        catalog_cfg.country_filter_id,
        catalog_cfg.type_id,
        &catalog_cfg.search_param,
    );

    let pipeline = VinPartsPipeline::new(Arc::new(gateway), paths);
    let state = AppState::new(pipeline);
    let app = build_router(state);

    let port = args.port.unwrap_or(toml_config.server.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
