//! Store traits and collaborator ports.
//!
//! These traits are the seams of the system: the `postgres` crate implements
//! them against a relational store, the `testing` crate provides in-memory
//! implementations for tests. All coordination happens through the backing
//! store's transactional guarantees — there is no in-process shared state.

use crate::error::Result;
use crate::status::{HousekeepingStatus, RoomStatus};
use crate::types::{
    Accommodation, AccommodationId, Booking, BookingId, Coupon, Room, RoomNumber, User, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Filter for availability searches.
///
/// The date range is mandatory: availability is always relative to a stay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityFilter {
    /// First night of the requested stay
    pub check_in: NaiveDate,
    /// Departure date of the requested stay
    pub check_out: NaiveDate,
    /// Restrict to a floor
    pub floor: Option<i16>,
    /// Restrict to a room type
    pub room_type: Option<String>,
    /// Require at least this capacity per room
    pub min_capacity: Option<u32>,
}

/// Whether two stays at the same room intersect.
///
/// The exact overlap predicate: `check_in < requested check-out AND
/// check_out > requested check-in`. Availability must use this test, never
/// the room's status flag alone, because status updates can lag bookings.
#[must_use]
pub fn stays_overlap(
    existing_in: NaiveDate,
    existing_out: NaiveDate,
    requested_in: NaiveDate,
    requested_out: NaiveDate,
) -> bool {
    existing_in < requested_out && existing_out > requested_in
}

/// Room and accommodation inventory.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Looks up a room by its number.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such room exists; `Store` on backend failure.
    async fn find_room(&self, number: &RoomNumber) -> Result<Room>;

    /// Looks up an accommodation listing.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such listing exists; `Store` on backend failure.
    async fn find_accommodation(&self, id: AccommodationId) -> Result<Accommodation>;

    /// Lists rooms free for the filter's date range.
    ///
    /// Excludes maintenance rooms and any room with an active booking that
    /// overlaps the range per [`stays_overlap`].
    ///
    /// # Errors
    ///
    /// `Store` on backend failure.
    async fn list_available(&self, filter: &AvailabilityFilter) -> Result<Vec<Room>>;

    /// Creates a room.
    ///
    /// # Errors
    ///
    /// `Store` on backend failure or duplicate room number.
    async fn create_room(&self, room: &Room) -> Result<()>;

    /// Moves a room's occupancy status through the transition table.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown rooms, `IllegalTransition` when the table
    /// forbids the change.
    async fn set_room_status(&self, number: &RoomNumber, to: RoomStatus) -> Result<Room>;

    /// Moves a room's housekeeping status through the transition table.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown rooms, `IllegalTransition` when the table
    /// forbids the change.
    async fn set_housekeeping_status(
        &self,
        number: &RoomNumber,
        to: HousekeepingStatus,
    ) -> Result<Room>;

    /// Creates an accommodation listing.
    ///
    /// # Errors
    ///
    /// `Store` on backend failure.
    async fn create_accommodation(&self, accommodation: &Accommodation) -> Result<()>;

    /// Lists all accommodation listings.
    ///
    /// # Errors
    ///
    /// `Store` on backend failure.
    async fn list_accommodations(&self) -> Result<Vec<Accommodation>>;

    /// Replaces an accommodation listing (explicit update; listings are
    /// otherwise immutable).
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown listings; `Store` on backend failure.
    async fn update_accommodation(&self, accommodation: &Accommodation) -> Result<()>;
}

/// Coupon persistence. Redemption lives in the ledger, not here.
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Looks up a coupon by its code.
    ///
    /// # Errors
    ///
    /// `NotFound` when no coupon has this code; `Store` on backend failure.
    async fn find_by_code(&self, code: &str) -> Result<Coupon>;

    /// Creates a coupon (staff operation).
    ///
    /// # Errors
    ///
    /// `Store` on backend failure or duplicate code.
    async fn create(&self, coupon: &Coupon) -> Result<()>;

    /// Clears a coupon's active flag, retiring it early.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown codes; `Store` on backend failure.
    async fn deactivate(&self, code: &str) -> Result<()>;
}

/// Registered user persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a user.
    ///
    /// # Errors
    ///
    /// `PhoneAlreadyRegistered` when the phone number is taken; `Store` on
    /// backend failure.
    async fn create(&self, user: &User) -> Result<()>;

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown users; `Store` on backend failure.
    async fn find_by_id(&self, id: UserId) -> Result<User>;

    /// Looks up a user by phone number.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown phones; `Store` on backend failure.
    async fn find_by_phone(&self, phone: &str) -> Result<User>;
}

/// Read access to persisted bookings.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Looks up a booking by id.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown bookings; `Store` on backend failure.
    async fn find(&self, id: BookingId) -> Result<Booking>;

    /// Lists bookings for a room that overlap the given stay.
    ///
    /// # Errors
    ///
    /// `Store` on backend failure.
    async fn list_overlapping(
        &self,
        room: &RoomNumber,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<Booking>>;
}

/// Why a bearer credential was not accepted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// The token is unknown or malformed.
    #[error("credential is not recognized")]
    Unknown,
    /// The token was valid once but has expired.
    #[error("credential has expired")]
    Expired,
}

/// External auth provider: validates a bearer credential.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verifies a token and returns the user it belongs to.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthRejection`] for unknown or expired tokens.
    async fn verify(&self, token: &str) -> Result<UserId, AuthRejection>;
}

/// Notification delivery failed.
///
/// Never affects booking outcomes; callers log and move on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// External notification dispatcher (confirmation emails and the like).
///
/// Fire-and-forget: invoked after commit, never awaited for correctness.
/// Duplicate sends are tolerable.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Sends a message to a recipient.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when delivery fails.
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Time source, injectable so tests can pin the clock.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current date, derived from [`Clock::now`].
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap_or_default()
    }

    #[test]
    fn overlap_is_exact_not_inclusive_of_touching_stays() {
        // Back-to-back stays share a turnover day and do not overlap.
        assert!(!stays_overlap(date(1), date(4), date(4), date(7)));
        assert!(!stays_overlap(date(4), date(7), date(1), date(4)));
    }

    #[test]
    fn containment_and_partial_overlap_are_detected() {
        assert!(stays_overlap(date(1), date(10), date(3), date(5)));
        assert!(stays_overlap(date(3), date(5), date(1), date(10)));
        assert!(stays_overlap(date(1), date(5), date(4), date(8)));
        assert!(stays_overlap(date(4), date(8), date(1), date(5)));
    }
}
