use axum::{extract::State, Json};
use crate::{models::HealthResponse, state::AppState};
use tracing::debug;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse::ok("Server is running"))
}

/// Readiness check endpoint
pub async fn ready_check(State(state): State<AppState>) -> Json<HealthResponse> {
    debug!("Readiness check requested");
    // Touching the store proves its lock is usable
    let listeners = state.store.pending_waiters() as u32;
    Json(HealthResponse {
        listeners: Some(listeners),
        ..HealthResponse::ok("Service is ready")
    })
}
