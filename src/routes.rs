//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`             - Service banner
//! - `POST /url/shorten`  - Create or fetch a short link
//! - `GET  /health`       - Health check: record store, cache
//! - `GET  /favicon.ico`  - Empty 204
//! - `GET  /{code}`       - Short link redirect
//!
//! Anything else, including a known path with the wrong method, gets a JSON 404.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api::handlers::{
    fallback_handler, favicon_handler, health_handler, index_handler, redirect_handler,
    shorten_handler,
};
use crate::api::middleware::tracing;
use crate::state::AppState;

/// Builds the routes and per-request middleware.
///
/// Static routes win over `/{code}`, so `/health` and `/favicon.ico` never
/// reach the redirect handler.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/url/shorten", post(shorten_handler))
        .route("/health", get(health_handler))
        .route("/favicon.ico", get(favicon_handler))
        .route("/{code}", get(redirect_handler))
        .fallback(fallback_handler)
        .method_not_allowed_fallback(fallback_handler)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application with trailing slashes trimmed before routing.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
