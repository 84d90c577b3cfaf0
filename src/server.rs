//! HTTP server initialization and runtime setup.
//!
//! Handles record store and cache setup, engine wiring, and the Axum server
//! lifecycle.

use crate::application::services::ResolutionEngine;
use crate::config::Config;
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::{cache, persistence};
use crate::infrastructure::cache::CacheService;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Wires the engine from already-built collaborators and the configuration.
pub fn build_engine(
    config: &Config,
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
) -> ResolutionEngine {
    ResolutionEngine::new(
        repository,
        cache,
        Arc::new(RandomCodeGenerator::new(config.code_length)),
        config.base_url.clone(),
    )
    .with_max_attempts(config.code_max_attempts)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Record store (PostgreSQL with migrations, or in-memory)
/// - Cache backend, connected in the background
/// - Resolution engine
/// - Axum HTTP server with graceful shutdown
///
/// Requests are served immediately; until the cache comes up every lookup
/// goes to the store.
///
/// # Errors
///
/// Returns an error if:
/// - Record store connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = persistence::open(&config).await?;
    let cache = cache::build(&config)?;

    let connecting = cache.clone();
    tokio::spawn(async move {
        if connecting.connect().await {
            tracing::info!("Cache connected");
        } else {
            tracing::warn!("Cache unavailable; serving from the record store only");
        }
    });

    let engine = Arc::new(build_engine(&config, repository.clone(), cache.clone()));
    let state = AppState::new(engine, repository, cache.clone(), config.url_max_length);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    cache.disconnect().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
