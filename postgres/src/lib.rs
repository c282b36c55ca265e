//! PostgreSQL persistence for Roomledger.
//!
//! Implements the store traits from `roomledger-core` plus the transactional
//! [`ledger::PgBookingLedger`]. All queries use runtime binding, so the crate
//! builds without a live database; migrations are embedded from
//! `./migrations`.

use roomledger_core::error::BookingError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

pub mod bookings;
pub mod coupons;
pub mod inventory;
pub mod ledger;
pub mod sessions;
pub mod users;

pub use bookings::PgBookingStore;
pub use coupons::PgCouponStore;
pub use inventory::PgInventoryStore;
pub use ledger::PgBookingLedger;
pub use sessions::PgTokenVerifier;
pub use users::PgUserStore;

/// Connects a pool with bounded timeouts.
///
/// # Errors
///
/// Returns the underlying `sqlx` error when the pool cannot be established.
pub async fn connect(
    url: &str,
    max_connections: u32,
    connect_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(connect_timeout)
        .connect(url)
        .await
}

/// Applies the embedded migrations.
///
/// # Errors
///
/// Returns the migration error from `sqlx`.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Wraps a storage failure into the domain taxonomy.
///
/// The only place raw `sqlx` errors cross into `BookingError`; everything
/// above the stores sees the taxonomy.
pub(crate) fn store_err(context: &str, err: &sqlx::Error) -> BookingError {
    BookingError::Store(format!("{context}: {err}"))
}

/// Maps a corrupt row (unparseable status, missing party fields) to a
/// storage error.
pub(crate) fn corrupt_row(context: &str) -> BookingError {
    BookingError::Store(format!("corrupt row: {context}"))
}
