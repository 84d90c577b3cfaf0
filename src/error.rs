//! Application error taxonomy and its HTTP representation.
//!
//! Cache failures never appear here: every cache backend absorbs its own
//! errors and reports them as misses. Everything below is either a store
//! outcome the engine must act on or a failure the caller has to see.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::db_error::unique_violation_field;

/// Which uniqueness constraint of the record store was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueField {
    /// Another record already owns this long URL.
    LongUrl,
    /// Another record already owns this short code.
    Code,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LongUrl => f.write_str("long_url"),
            Self::Code => f.write_str("code"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to HTTP clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The short code is absent from both cache and store.
    #[error("Short link not found")]
    NotFound { code: String },

    /// No route matches the request.
    #[error("Route {path} not found")]
    RouteNotFound { path: String },

    /// A store uniqueness constraint rejected an insert.
    ///
    /// The resolution engine absorbs this; it only escapes under abnormal load.
    #[error("Unique constraint violation on {field}")]
    DuplicateKey { field: UniqueField },

    /// Every attempt to allocate a fresh code collided.
    #[error("Service temporarily unable to allocate a short code")]
    GenerationExhausted { attempts: usize },

    /// The record store could not be reached or failed the query.
    #[error("Record store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// Request input was rejected before reaching the engine.
    #[error("{message}")]
    Validation { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } | Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::DuplicateKey { .. } => StatusCode::CONFLICT,
            Self::GenerationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::StoreUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Converts the error into the payload sent to clients.
    ///
    /// Store failure details stay in the logs; clients only see a generic message.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            Self::NotFound { code } => ErrorInfo {
                code: "not_found",
                message: self.to_string(),
                details: json!({ "code": code }),
            },
            Self::RouteNotFound { path } => ErrorInfo {
                code: "not_found",
                message: self.to_string(),
                details: json!({ "path": path }),
            },
            Self::DuplicateKey { field } => ErrorInfo {
                code: "conflict",
                message: self.to_string(),
                details: json!({ "field": field }),
            },
            Self::GenerationExhausted { attempts } => ErrorInfo {
                code: "code_allocation_failed",
                message: self.to_string(),
                details: json!({ "attempts": attempts }),
            },
            Self::StoreUnavailable { .. } => ErrorInfo {
                code: "internal_error",
                message: "Internal server error".to_string(),
                details: json!({}),
            },
            Self::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::StoreUnavailable { message } = &self {
            tracing::error!(error = %message, "Record store failure");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(field) = unique_violation_field(&e) {
            return Self::DuplicateKey { field };
        }

        Self::store_unavailable(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        Self::bad_request("Request validation failed", details)
    }
}
