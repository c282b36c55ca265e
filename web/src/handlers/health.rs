//! Health check endpoints.

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use roomledger_core::error::BookingError;
use roomledger_core::store::BookingStore;
use roomledger_core::types::BookingId;
use serde::Serialize;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Liveness check.
///
/// Returns 200 OK if the process is running; does not verify dependencies.
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,
    /// Backing store connectivity
    pub store: bool,
}

/// Readiness check.
///
/// Probes the backing store with a lookup of a fresh random id: a clean
/// not-found means the store answered; a storage error means it did not.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let store_ready = match state.bookings.find(BookingId::new()).await {
        Ok(_) | Err(BookingError::NotFound { .. }) => true,
        Err(_) => false,
    };
    let status = if store_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(ReadinessResponse {
            ready: store_ready,
            store: store_ready,
        }),
    )
}
