//! HTTP layer for the Roomledger reservation platform.
//!
//! Wires the domain's stores and ledger into an Axum router: typed error
//! responses, health endpoints, and handlers for bookings, rooms,
//! accommodations, coupons, and users. The `server` binary assembles the
//! Postgres-backed state; tests drive the same router over in-memory
//! implementations.

pub mod config;
pub mod error;
pub mod handlers;
pub mod notify;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use notify::ConsoleDispatcher;
pub use routes::build_router;
pub use state::AppState;
