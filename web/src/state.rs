//! Application state shared across HTTP handlers.

use roomledger_core::ledger::BookingLedger;
use roomledger_core::store::{
    BookingStore, Clock, CouponStore, InventoryStore, NotificationDispatcher, TokenVerifier,
    UserStore,
};
use std::sync::Arc;

/// Shared resources for the HTTP layer.
///
/// Holds the ledger, the stores, and the external collaborator ports behind
/// trait objects, so the same handlers serve the Postgres-backed production
/// wiring and the in-memory wiring used by tests. Cloned (cheaply via Arc)
/// for each request.
#[derive(Clone)]
pub struct AppState {
    /// Room and accommodation inventory
    pub inventory: Arc<dyn InventoryStore>,
    /// Coupon persistence
    pub coupons: Arc<dyn CouponStore>,
    /// Registered user persistence
    pub users: Arc<dyn UserStore>,
    /// Read access to bookings
    pub bookings: Arc<dyn BookingStore>,
    /// Transactional booking writes
    pub ledger: Arc<dyn BookingLedger>,
    /// Bearer credential verification
    pub verifier: Arc<dyn TokenVerifier>,
    /// Post-commit notification delivery
    pub dispatcher: Arc<dyn NotificationDispatcher>,
    /// Time source
    pub clock: Arc<dyn Clock>,
}
