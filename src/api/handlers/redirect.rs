//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::validate_code;

/// Paths served elsewhere (or nowhere) that must never resolve as codes.
pub const RESERVED_CODES: &[&str] = &["health", "favicon.ico", "robots.txt", "sitemap.xml"];

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Reject reserved system paths with 404
/// 2. Validate the code format
/// 3. Resolve through the engine (cache first, then store)
/// 4. Return 302 Found with the long URL as `Location`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 400 Bad Request if the code is malformed.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if RESERVED_CODES.contains(&code.as_str()) {
        debug!(code, "Reserved path requested as short code");
        return Err(AppError::not_found(code));
    }

    validate_code(&code)?;

    let long_url = state.engine.resolve_code(&code).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, long_url)]))
}
