//! Liveness and readiness checks for the budget service.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;
use crate::error::ApiResult;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `healthy` or `ready`.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Server build version.
    pub version: &'static str,
}

impl HealthResponse {
    const fn new(status: &'static str) -> Self {
        Self {
            status,
            service: "itbudget",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// GET /health - The process is up. Never touches the budget store.
async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

/// GET /health/ready - The budget store answers; 503 otherwise.
async fn readiness(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.db.ping().await?;
    Ok(Json(HealthResponse::new("ready")))
}

/// Creates the health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(liveness))
        .route("/health/ready", get(readiness))
}
