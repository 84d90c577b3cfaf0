//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::api::dto::health::{CacheCheck, CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Record store reachable (cache may be degraded)
/// - **503 Service Unavailable**: Record store unreachable
///
/// The cache never fails the check. A configured cache that is down turns the
/// overall status into `degraded`; a disabled cache is reported as such.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "timestamp": "2025-01-01T12:00:00Z",
///   "uptime_seconds": 3600,
///   "checks": {
///     "database": { "status": "ok" },
///     "cache": {
///       "status": "ok",
///       "backend": "redis",
///       "connected": true,
///       "retry_count": 0,
///       "max_retries": 3
///     }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let cache_check = check_cache(&state).await;

    let store_ok = db_check.status == "ok";
    let status = if !store_ok {
        "unhealthy"
    } else if cache_check.status == "error" {
        "degraded"
    } else {
        "healthy"
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        checks: HealthChecks {
            database: db_check,
            cache: cache_check,
        },
    };

    if store_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks record store connectivity.
async fn check_database(state: &AppState) -> CheckStatus {
    match state.repository.health_check().await {
        Ok(()) => CheckStatus {
            status: "ok".to_string(),
            message: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Health check: record store unreachable");
            CheckStatus {
                status: "error".to_string(),
                message: Some("Record store unreachable".to_string()),
            }
        }
    }
}

/// Reports cache connection state, pinging it when connected.
async fn check_cache(state: &AppState) -> CacheCheck {
    let details = state.cache.status().await;

    let status = if details.backend == "none" {
        "disabled"
    } else if details.connected && state.cache.health_check().await {
        "ok"
    } else {
        "error"
    };

    CacheCheck {
        status: status.to_string(),
        details,
    }
}
