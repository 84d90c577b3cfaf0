//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::domain::entities::CreateStatus;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validator::validate_long_url;

/// Creates (or returns the existing) short URL for a long URL.
///
/// # Endpoint
///
/// `POST /url/shorten`
///
/// # Request Body
///
/// ```json
/// { "longUrl": "https://example.com/a" }
/// ```
///
/// # Response
///
/// `201 Created` for a new link, `200 OK` when the link already existed.
///
/// ```json
/// {
///   "status": true,
///   "message": "Short URL created successfully",
///   "data": {
///     "urlCode": "abc123XY",
///     "shortUrl": "http://localhost:3000/abc123XY",
///     "longUrl": "https://example.com/a"
///   }
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body or URL is invalid.
/// Returns 503 Service Unavailable if no free code could be allocated.
/// Returns 500 Internal Server Error if the record store fails.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    payload.validate()?;

    let long_url = validate_long_url(&payload.long_url, state.url_max_length)?;
    let link = state.engine.create_short_link(&long_url).await?;

    let status = match link.status {
        CreateStatus::Created => StatusCode::CREATED,
        CreateStatus::AlreadyExists | CreateStatus::ServedFromCache => StatusCode::OK,
    };

    Ok((status, Json(link.into())))
}
