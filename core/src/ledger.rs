//! Booking ledger: the transactional write side of the reservation engine.
//!
//! The trait is implemented by the Postgres ledger (production) and the
//! in-memory ledger (tests). Both run the same precondition pipeline from
//! this module before committing, so rejection behavior cannot drift between
//! implementations. The commit itself — coupon re-validation and decrement,
//! room status flip, booking insert — is a single atomic transaction in
//! whichever store backs the ledger.

use crate::error::{BookingError, Result};
use crate::status::{BookingKind, PaymentStatus};
use crate::types::{Booking, BookingId, BookingTarget, EmployeeId, Party, Room};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A validated request to create a booking.
///
/// The party has already been resolved (§ guest registration); the coupon
/// code, if present, is re-validated inside the commit transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// What to book
    pub target: BookingTarget,
    /// Who the booking is for
    pub party: Party,
    /// First night of the stay
    pub check_in: NaiveDate,
    /// Departure date
    pub check_out: NaiveDate,
    /// Number of guests
    pub guest_count: u32,
    /// Number of rooms
    pub room_count: u32,
    /// Coupon code to redeem, if any
    pub coupon_code: Option<String>,
    /// Online or front-desk booking
    pub booking_kind: BookingKind,
    /// Assisting staff member, for front-desk bookings
    pub employee: Option<EmployeeId>,
}

/// Allow-listed booking mutation.
///
/// Only the payment status (state-machine checked) and the assisting
/// employee may change after creation. Dates, prices, party, and target are
/// immutable; rebooking means cancel and recreate. Fields outside this
/// struct are unrepresentable by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPatch {
    /// New payment status, checked against the transition table
    pub payment_status: Option<PaymentStatus>,
    /// New assisting employee
    pub employee: Option<EmployeeId>,
}

/// Creates, updates, and cancels bookings atomically.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Creates a booking as one all-or-nothing transaction.
    ///
    /// Two concurrent requests for the same room and overlapping dates
    /// cannot both succeed; the loser gets `RoomUnavailable` and should
    /// re-search rather than blind-retry.
    ///
    /// # Errors
    ///
    /// Any precondition failure from [`validate_request`],
    /// [`check_room_assignable`], or [`check_capacity`]; `NotFound` for an
    /// unknown target or coupon code; `CouponRejected` when the supplied
    /// coupon fails validation; `CouponNoLongerValid` when it races away
    /// between validation and commit; `RoomUnavailable` on assignment
    /// conflict; `Store` on backend failure. No partial writes survive a
    /// rejection.
    async fn create_booking(&self, request: BookingRequest) -> Result<Booking>;

    /// Applies an allow-listed patch to a booking.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown bookings, `IllegalTransition` when the payment
    /// status change is not permitted, `Store` on backend failure.
    async fn update_booking(&self, id: BookingId, patch: BookingPatch) -> Result<Booking>;

    /// Cancels a booking.
    ///
    /// Releases a held room back to available (housekeeping moves to
    /// waiting-for-clean). A redeemed coupon is not refunded.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown bookings, `Store` on backend failure.
    async fn cancel_booking(&self, id: BookingId) -> Result<()>;
}

/// Date and count preconditions, checked before touching the store.
///
/// # Errors
///
/// `InvalidDateRange` when check-out is not after check-in, `CheckInInPast`
/// when the stay starts before `today`, `NoGuests` / `NoRooms` for zero
/// counts.
pub fn validate_request(request: &BookingRequest, today: NaiveDate) -> Result<()> {
    if request.check_out <= request.check_in {
        return Err(BookingError::InvalidDateRange);
    }
    if request.check_in < today {
        return Err(BookingError::CheckInInPast);
    }
    if request.guest_count == 0 {
        return Err(BookingError::NoGuests);
    }
    if request.room_count == 0 {
        return Err(BookingError::NoRooms);
    }
    Ok(())
}

/// Whether a room can take a new booking right now.
///
/// Checked before any pricing is computed. Maintenance and occupied rooms
/// are unavailable; available and reserved rooms can be assigned.
///
/// # Errors
///
/// `RoomUnavailable` for maintenance or occupied rooms.
pub fn check_room_assignable(room: &Room) -> Result<()> {
    use crate::status::RoomStatus::{Maintenance, Occupied};
    if matches!(room.room_status, Maintenance | Occupied) || room.current_booking.is_some() {
        return Err(BookingError::RoomUnavailable);
    }
    Ok(())
}

/// Whether the party fits the booked capacity.
///
/// # Errors
///
/// `CapacityExceeded` when `guest_count` exceeds `capacity_per_room x
/// room_count`.
pub fn check_capacity(capacity_per_room: u32, room_count: u32, guest_count: u32) -> Result<()> {
    let capacity = capacity_per_room.saturating_mul(room_count);
    if guest_count > capacity {
        return Err(BookingError::CapacityExceeded {
            guests: guest_count,
            capacity,
        });
    }
    Ok(())
}
