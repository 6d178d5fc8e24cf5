//! Transit Cache - priority-aware in-memory caching
//!
//! Hosts one cache instance with its periodic sweeper, memory-pressure
//! responder and local admin API.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transit_cache::api::create_router;
use transit_cache::{spawn_cleanup_task, spawn_memory_pressure_responder, AppState, Config};

/// Main entry point for the cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and its memory-pressure signal
/// 4. Start the periodic sweeper and the memory-pressure responder
/// 5. Serve the admin API on the configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transit_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Transit Cache");

    let config = Config::from_env();
    let cache_config = config.cache_config().context("invalid cache configuration")?;
    info!(
        "Configuration loaded: max_entries={}, max_size_bytes={}, threshold={}, max_age={}s, cleanup_interval={}s, access_tracking={:?}, port={}",
        config.max_entries,
        config.max_size_bytes,
        config.cleanup_threshold,
        config.max_age,
        config.cleanup_interval,
        config.access_tracking,
        config.server_port
    );

    let state = AppState::from_config(cache_config);
    info!("Cache initialized");

    let sweeper = spawn_cleanup_task(state.cache.clone(), config.cleanup_interval());
    let responder =
        spawn_memory_pressure_responder(state.cache.clone(), state.memory_signal.subscribe());
    info!("Background tasks started");

    let app = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Admin API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(vec![sweeper, responder]))
        .await
        .context("admin server failed")?;

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the background
/// tasks.
async fn shutdown_signal(tasks: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for task in tasks {
        task.abort();
    }
    warn!("Background tasks aborted");
}
