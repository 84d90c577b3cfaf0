//! Service banner and browser noise endpoints.

use axum::{
    Json,
    http::{StatusCode, Uri},
};
use serde_json::{Value, json};

use crate::error::AppError;

/// Describes the service and its endpoints.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "shorten": "POST /url/shorten",
            "redirect": "GET /{code}",
            "health": "GET /health",
        },
    }))
}

/// `GET /favicon.ico` - nothing to serve.
pub async fn favicon_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Fallback for requests no route matches.
pub async fn fallback_handler(uri: Uri) -> AppError {
    AppError::RouteNotFound {
        path: uri.path().to_string(),
    }
}
