//! Roomledger domain core.
//!
//! Pure domain model and rules for a hotel reservation platform: inventory
//! types, status state machines, the pricing calculator, coupon validation,
//! guest party resolution, the error taxonomy, and the store/ledger traits
//! the `postgres` and `testing` crates implement.
//!
//! This crate does no I/O. Everything here is deterministic given a clock,
//! which is itself injected through the [`store::Clock`] trait.

pub mod coupon;
pub mod error;
pub mod ledger;
pub mod party;
pub mod pricing;
pub mod status;
pub mod store;
pub mod types;

pub use coupon::{CouponRejection, ValidCoupon};
pub use error::{BookingError, Result};
pub use ledger::{BookingLedger, BookingPatch, BookingRequest};
pub use party::{GuestForm, resolve_booking_party};
pub use pricing::{Discount, Quote, quote};
pub use status::{BookingKind, HousekeepingStatus, PaymentStatus, RoomStatus};
pub use store::{
    AuthRejection, AvailabilityFilter, BookingStore, Clock, CouponStore, InventoryStore,
    NotificationDispatcher, NotifyError, SystemClock, TokenVerifier, UserStore, stays_overlap,
};
pub use types::{
    Accommodation, AccommodationId, Booking, BookingId, BookingTarget, Coupon, CouponId,
    EmployeeId, GuestProfile, Money, Party, Room, RoomId, RoomNumber, User, UserId,
};
