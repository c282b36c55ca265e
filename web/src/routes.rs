//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints.

use crate::handlers::health::{health_check, readiness_check};
use crate::handlers::{accommodations, bookings, coupons, rooms, users};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Health checks live at the root; everything else sits under `/api`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Bookings
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/:id", get(bookings::get_booking))
        .route("/bookings/:id", patch(bookings::update_booking))
        .route("/bookings/:id", delete(bookings::cancel_booking))
        // Room inventory
        .route("/rooms", get(rooms::list_available))
        .route("/rooms", post(rooms::create_room))
        .route("/rooms/:number", get(rooms::get_room))
        .route("/rooms/:number/status", put(rooms::set_room_status))
        .route(
            "/rooms/:number/housekeeping",
            put(rooms::set_housekeeping_status),
        )
        // Accommodation listings
        .route("/accommodations", get(accommodations::list_accommodations))
        .route("/accommodations", post(accommodations::create_accommodation))
        .route("/accommodations/:id", get(accommodations::get_accommodation))
        .route("/accommodations/:id", put(accommodations::update_accommodation))
        // Coupons
        .route("/coupons", post(coupons::create_coupon))
        .route("/coupons/:code", get(coupons::preview_coupon))
        .route("/coupons/:code", delete(coupons::deactivate_coupon))
        // Users
        .route("/users", post(users::register_user))
        .route("/users/:id", get(users::get_user));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
