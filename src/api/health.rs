//! Health check endpoints for orchestration probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::types::Json;

use super::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthResponse {
    fn new(status: HealthStatus) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            users: None,
            latency_ms: None,
        }
    }
}

/// Returns 200 while the process is up
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::new(HealthStatus::Healthy)))
}

/// Liveness probe; never touches the store
pub async fn live_check() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::new(HealthStatus::Healthy)))
}

/// Readiness probe: the user store must answer a count query
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    match state.user_service.count().await {
        Ok(count) => {
            let mut response = HealthResponse::new(HealthStatus::Healthy);
            response.users = Some(count);
            response.latency_ms = Some(start.elapsed().as_millis() as u64);

            (StatusCode::OK, Json(response))
        }
        Err(e) => {
            warn!(error = %e, "Readiness check failed");

            let mut response = HealthResponse::new(HealthStatus::Unhealthy);
            response.latency_ms = Some(start.elapsed().as_millis() as u64);

            (StatusCode::SERVICE_UNAVAILABLE, Json(response))
        }
    }
}
