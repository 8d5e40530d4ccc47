//! Health endpoints.
//!
//! - `/health`: liveness, `OK` while the process serves requests
//! - `/api/health`: dependency check of the database and the session cache

use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

pub async fn health_check() -> &'static str {
    "OK"
}

/// Returns 502 when either dependency fails. Details are logged, not returned.
#[tracing::instrument(skip_all, name = "rsvp.health.dependencies")]
pub async fn api_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match sqlx::query("SELECT 1").fetch_one(&state.pool).await {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::warn!(target: "rsvp.health", error = %e, "Health check failed: database error");
            "unhealthy"
        }
    };

    let cache = match state.sessions.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!(target: "rsvp.health", error = %e, "Health check failed: cache error");
            "unhealthy"
        }
    };

    let healthy = database == "healthy" && cache == "healthy";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "unavailable" },
            database,
            cache,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        assert_eq!(health_check().await, "OK");
    }
}
