//! Health endpoints
//!
//! - /health - status report including a database round-trip
//! - /health/ready - readiness probe, 503 until the database answers
//! - /health/live - liveness probe, OK whenever the process is up

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl HealthResponse {
    fn new(status: &str, database: Option<String>) -> Self {
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
        }
    }
}

/// Status report. Stays 200 even when the database is down so operators
/// can read the failure; the readiness probe carries the 503 semantics.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let response = match db::health_check(&state.db).await {
        Ok(()) => HealthResponse::new("healthy", Some("ok".to_string())),
        Err(e) => HealthResponse::new("degraded", Some(e.to_string())),
    };
    Json(response)
}

/// Readiness probe. Returns 503 until the database answers a round-trip.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match db::health_check(&state.db).await {
        Ok(()) => Ok(Json(HealthResponse::new("ready", Some("ok".to_string())))),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::new("not_ready", Some(e.to_string()))),
        )),
    }
}

/// Liveness probe. OK whenever the process can answer at all.
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("alive", None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness_check_returns_alive() {
        let response = liveness_check().await;
        assert_eq!(response.status, "alive");
        assert!(!response.version.is_empty());
        assert!(response.database.is_none());
    }
}
