//! lostfound-api - Lost & found HTTP service
//!
//! Serves the item/claim REST API, the live update SSE stream and
//! uploaded photos.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lostfound_common::config::{ConfigOverrides, TomlConfig};
use lostfound_api::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for lostfound-api
#[derive(Parser, Debug)]
#[command(name = "lostfound-api")]
#[command(about = "Lost & found item and claim service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Interface to bind
    #[arg(long, env = "LOSTFOUND_HOST")]
    host: Option<String>,

    /// Directory for uploaded item photos
    #[arg(short, long, env = "LOSTFOUND_UPLOADS_DIR")]
    uploads_dir: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(short, long, env = "LOSTFOUND_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts so the file can set the level;
    // problems are reported once the subscriber is up
    let loaded = TomlConfig::load_or_default(args.config.as_deref());
    let log_level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("lostfound_api={0},lostfound_common={0},tower_http={0}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting lostfound-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Some(path) = args.config.as_deref().filter(|p| !p.exists()) {
        warn!("Config file {} not found, using defaults", path.display());
    }

    let config = loaded
        .context("Failed to load configuration")?
        .apply_overrides(ConfigOverrides {
            host: args.host,
            port: args.port,
            uploads_dir: args.uploads_dir,
        });

    tokio::fs::create_dir_all(&config.uploads_dir)
        .await
        .with_context(|| format!("Failed to create uploads dir {}", config.uploads_dir.display()))?;
    info!("Uploads directory: {}", config.uploads_dir.display());
    info!("Claim policy: {:?}", config.claim_policy);

    let state = AppState::from_config(&config);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("lostfound-api listening on http://{}", addr);
    info!("Live updates: http://{}/api/events", addr);

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
            info!("Received SIGTERM, shutting down");
        },
    }
}
