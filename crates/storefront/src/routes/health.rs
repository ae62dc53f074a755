//! Liveness and readiness probes.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use shopora_core::api::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// Liveness: the process is up and serving.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    })
}

/// Readiness: the catalog store answers.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, backend = state.catalog().kind(), "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "unavailable".to_string(),
                }),
            )
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{get_json, test_app};

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(test_app(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_ready_memory_backend() {
        let (status, body) = get_json(test_app(), "/api/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }
}
