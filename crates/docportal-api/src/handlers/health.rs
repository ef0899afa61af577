//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use docportal_database::connection::ping;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let database = ping(&state.db_pool).await.unwrap_or(false);
    let storage = state.storage_manager.health_check().await;

    let status = if database && storage {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if status == StatusCode::OK { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if database { "connected" } else { "unavailable" }.to_string(),
        storage: if storage { "available" } else { "unavailable" }.to_string(),
    };

    (status, Json(ApiResponse::ok(body)))
}
