//! Domain types for the hotel reservation platform.
//!
//! Value objects (identifiers, money, room numbers) and the entities they
//! describe: rooms, accommodations, coupons, bookings, and registered users.

use crate::status::{BookingKind, HousekeepingStatus, PaymentStatus, RoomStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing `Uuid`.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner `Uuid`.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a physical room record.
    RoomId
);
uuid_id!(
    /// Unique identifier for a bookable accommodation listing.
    AccommodationId
);
uuid_id!(
    /// Unique identifier for a coupon.
    CouponId
);
uuid_id!(
    /// Unique identifier for a booking.
    BookingId
);
uuid_id!(
    /// Unique identifier for a registered user.
    UserId
);
uuid_id!(
    /// Unique identifier for a staff member assisting a booking.
    EmployeeId
);

/// Room number: the natural, human-facing key of a physical room.
///
/// Unique across the property ("101", "A-204"). Used as the lookup key for
/// all inventory operations.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomNumber(String);

impl RoomNumber {
    /// Creates a room number from its string form.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Returns the room number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Money
// ============================================================================

/// A currency amount in whole units.
///
/// The domain has no sub-unit currency, so amounts are whole integers.
/// Arithmetic is checked or saturating; a `Money` value is never negative.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from whole currency units.
    ///
    /// Negative inputs are clamped to zero.
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        if units < 0 { Self(0) } else { Self(units) }
    }

    /// Returns the amount in whole currency units.
    #[must_use]
    pub const fn as_units(&self) -> i64 {
        self.0
    }

    /// Checked multiplication by a count (nights, rooms).
    #[must_use]
    pub const fn checked_mul(self, count: u32) -> Option<Self> {
        match self.0.checked_mul(count as i64) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }

    /// Subtraction clamped at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        let units = self.0 - other.0;
        if units < 0 { Self(0) } else { Self(units) }
    }

    /// Percentage of this amount, rounded half-up to the nearest unit.
    ///
    /// Computed in `i128` so an amount near `i64::MAX` cannot wrap into a
    /// negative result; saturates at `i64::MAX`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn percent_of(self, percent: u8) -> Self {
        let units = (self.0 as i128 * percent as i128 + 50) / 100;
        if units > i64::MAX as i128 {
            Self(i64::MAX)
        } else {
            Self(units as i64)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Inventory entities
// ============================================================================

/// A physical room: discrete, numbered inventory with live status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Record identifier
    pub id: RoomId,
    /// Unique room number (natural key)
    pub room_number: RoomNumber,
    /// Floor the room is on
    pub floor: i16,
    /// Maximum number of guests per room
    pub capacity: u32,
    /// Room category ("single", "double", "suite", ...)
    pub room_type: String,
    /// Price per night
    pub nightly_rate: Money,
    /// Base discount applied when no coupon is present, in percent
    pub discount_percent: u8,
    /// Occupancy state
    pub room_status: RoomStatus,
    /// Housekeeping state
    pub housekeeping_status: HousekeepingStatus,
    /// The booking currently holding this room, if any
    pub current_booking: Option<BookingId>,
}

/// A bookable listing without discrete room inventory.
///
/// Used as a booking target when the property sells a category ("Deluxe
/// Double") rather than a numbered room. Immutable except through explicit
/// update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Accommodation {
    /// Record identifier
    pub id: AccommodationId,
    /// Listing title
    pub title: String,
    /// Listing description
    pub description: String,
    /// Price per night
    pub base_price: Money,
    /// Maximum number of adults
    pub max_adults: u32,
    /// Feature list ("wifi", "balcony", ...)
    pub specs: Vec<String>,
    /// Image URLs
    pub images: Vec<String>,
    /// When the listing was created
    pub created_at: DateTime<Utc>,
}

/// A discount coupon.
///
/// Invariants: `0 < percent <= 100`; `quantity` counts remaining redemptions
/// and can never go negative (enforced by type and by the conditional
/// decrement at commit).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Record identifier
    pub id: CouponId,
    /// Unique coupon code
    pub code: String,
    /// Discount in percent, `(0, 100]`
    pub percent: u8,
    /// Remaining redemptions
    pub quantity: u32,
    /// Last instant at which the coupon is usable
    pub expires_at: DateTime<Utc>,
    /// Cleared by staff to retire a coupon early
    pub is_active: bool,
}

// ============================================================================
// Booking
// ============================================================================

/// What a booking reserves: a numbered room or an accommodation listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum BookingTarget {
    /// A discrete physical room, held exclusively while the booking is active
    Room(RoomNumber),
    /// A listing without discrete inventory
    Accommodation(AccommodationId),
}

/// The person a booking is attributed to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    /// A registered user, resolved from a verified credential
    User(UserId),
    /// A one-off guest profile attached inline to the booking
    Guest(GuestProfile),
}

/// Inline guest details for unauthenticated bookings.
///
/// Every field except `vehicle_number` is required; completeness is enforced
/// by [`crate::party::GuestForm::into_profile`], never defaulted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuestProfile {
    /// Guest's full name
    pub name: String,
    /// Guest's age in years
    pub age: u32,
    /// Father's name
    pub father_name: String,
    /// Postal address
    pub address: String,
    /// Mobile phone number
    pub mobile: String,
    /// Nationality
    pub nationality: String,
    /// Profession
    pub profession: String,
    /// Passport number or national ID
    pub passport_or_nid: String,
    /// Guest category ("tourist", "business", ...)
    pub guest_type: String,
    /// Vehicle registration, if the guest arrives by car
    pub vehicle_number: Option<String>,
}

/// A persisted booking.
///
/// Dates and prices are fixed at creation; only `payment_status` and the
/// assisting employee may change afterwards. `total_price` is derived by the
/// pricing calculator and never independently settable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Record identifier
    pub id: BookingId,
    /// What was booked
    pub target: BookingTarget,
    /// Who the booking is for
    pub party: Party,
    /// First night of the stay
    pub check_in: NaiveDate,
    /// Departure date (exclusive; must be after `check_in`)
    pub check_out: NaiveDate,
    /// Number of guests
    pub guest_count: u32,
    /// Number of rooms booked
    pub room_count: u32,
    /// Nightly rate snapshot taken at creation
    pub room_price: Money,
    /// Coupon percent applied, if any
    pub coupon_percent: Option<u8>,
    /// Derived total for the whole stay
    pub total_price: Money,
    /// Payment lifecycle state
    pub payment_status: PaymentStatus,
    /// How the booking was made
    pub booking_kind: BookingKind,
    /// Redeemed coupon, if any
    pub coupon: Option<CouponId>,
    /// Staff member who assisted, for offline bookings
    pub employee: Option<EmployeeId>,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
}

/// A registered user profile.
///
/// Phone uniqueness is the primary identity invariant, enforced by the user
/// store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Record identifier
    pub id: UserId,
    /// Full name
    pub name: String,
    /// Phone number (unique)
    pub phone: String,
    /// Email address
    pub email: Option<String>,
    /// Postal address
    pub address: String,
    /// National ID number
    pub nid: Option<String>,
    /// Passport number
    pub passport: Option<String>,
    /// Nationality
    pub nationality: String,
    /// Profession
    pub profession: String,
    /// Age in years
    pub age: u32,
    /// Marital status
    pub marital_status: String,
    /// Vehicle registration
    pub vehicle_number: Option<String>,
    /// Father's name
    pub father_name: String,
    /// Role ("guest", "staff", "admin")
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_percent_rounds_half_up() {
        assert_eq!(Money::from_units(9000).percent_of(10).as_units(), 900);
        assert_eq!(Money::from_units(999).percent_of(10).as_units(), 100);
        assert_eq!(Money::from_units(994).percent_of(10).as_units(), 99);
    }

    #[test]
    fn money_percent_of_a_huge_amount_does_not_wrap() {
        let amount = Money::from_units(i64::MAX);
        let cut = amount.percent_of(37);
        assert!(cut.as_units() > 0);
        assert!(cut <= amount);
        assert_eq!(amount.percent_of(100), amount);
    }

    #[test]
    fn money_never_negative() {
        assert_eq!(Money::from_units(-5), Money::ZERO);
        assert_eq!(
            Money::from_units(100).saturating_sub(Money::from_units(250)),
            Money::ZERO
        );
    }

    #[test]
    fn room_number_display_matches_input() {
        let number = RoomNumber::new("A-204");
        assert_eq!(number.as_str(), "A-204");
        assert_eq!(number.to_string(), "A-204");
    }
}
