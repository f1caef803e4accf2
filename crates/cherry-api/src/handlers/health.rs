//! Service root and health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /
pub async fn root() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Welcome to Cherry Studio API"))
}

/// GET /api/v1/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match state.stores.users.health_check().await {
        Ok(up) => up,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };
    let storage = state.storage.health_check().await;

    Json(ApiResponse::ok(HealthResponse {
        database,
        storage,
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
