//! Error taxonomy for booking operations.
//!
//! The ledger is the single point that converts storage failures into this
//! taxonomy; callers above it never see raw database errors. Variants fall
//! into four classes — validation, conflict, not-found, and storage — which
//! the web layer maps onto HTTP statuses.

use crate::coupon::CouponRejection;
use thiserror::Error;

/// Result type alias for booking operations.
pub type Result<T, E = BookingError> = std::result::Result<T, E>;

/// All failure modes of the reservation engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    // ═══════════════════════════════════════════════════════════
    // Validation (malformed input; never retried automatically)
    // ═══════════════════════════════════════════════════════════
    /// Check-out is not after check-in.
    #[error("check-out must be after check-in")]
    InvalidDateRange,

    /// Check-in lies in the past.
    #[error("check-in date is in the past")]
    CheckInInPast,

    /// Guest count below one.
    #[error("guest count must be at least 1")]
    NoGuests,

    /// Room count below one.
    #[error("room count must be at least 1")]
    NoRooms,

    /// Party does not fit the booked capacity.
    #[error("party of {guests} exceeds capacity of {capacity}")]
    CapacityExceeded {
        /// Requested guest count
        guests: u32,
        /// Total capacity of the booked rooms
        capacity: u32,
    },

    /// No usable credential and the guest form is missing required fields.
    #[error("incomplete guest profile, missing: {}", missing.join(", "))]
    IncompleteGuestProfile {
        /// Names of the missing fields
        missing: Vec<&'static str>,
    },

    /// A status change not permitted by the transition table.
    #[error("illegal {entity} transition {from} -> {to}")]
    IllegalTransition {
        /// Which state machine rejected the change
        entity: &'static str,
        /// State before the attempted change
        from: String,
        /// Requested target state
        to: String,
    },

    /// Phone number uniqueness violated at user registration.
    #[error("phone number is already registered")]
    PhoneAlreadyRegistered,

    /// Coupon failed validation before commit.
    #[error("coupon rejected: {0}")]
    CouponRejected(CouponRejection),

    // ═══════════════════════════════════════════════════════════
    // Conflict (state raced away; re-query and retry with new
    // parameters, never blind-retry)
    // ═══════════════════════════════════════════════════════════
    /// Room is held, under maintenance, or overlaps an active booking.
    #[error("room is not available for the requested stay")]
    RoomUnavailable,

    /// Coupon passed validation but changed before commit.
    #[error("coupon is no longer valid: {reason}")]
    CouponNoLongerValid {
        /// What the re-validation found
        reason: CouponRejection,
    },

    // ═══════════════════════════════════════════════════════════
    // Not found
    // ═══════════════════════════════════════════════════════════
    /// Referenced entity does not exist.
    #[error("{resource} not found")]
    NotFound {
        /// Entity kind ("room", "booking", "coupon", ...)
        resource: &'static str,
    },

    // ═══════════════════════════════════════════════════════════
    // Storage
    // ═══════════════════════════════════════════════════════════
    /// Backing store failure; details stay server-side.
    #[error("storage error: {0}")]
    Store(String),
}

impl BookingError {
    /// Whether the caller may succeed by re-querying and retrying with
    /// adjusted parameters.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::RoomUnavailable | Self::CouponNoLongerValid { .. }
        )
    }

    /// Whether this is a client-input problem.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateRange
                | Self::CheckInInPast
                | Self::NoGuests
                | Self::NoRooms
                | Self::CapacityExceeded { .. }
                | Self::IncompleteGuestProfile { .. }
                | Self::IllegalTransition { .. }
                | Self::PhoneAlreadyRegistered
                | Self::CouponRejected(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_disjoint() {
        let conflict = BookingError::RoomUnavailable;
        assert!(conflict.is_conflict());
        assert!(!conflict.is_validation());

        let validation = BookingError::InvalidDateRange;
        assert!(validation.is_validation());
        assert!(!validation.is_conflict());

        let not_found = BookingError::NotFound { resource: "room" };
        assert!(!not_found.is_conflict());
        assert!(!not_found.is_validation());
    }

    #[test]
    fn incomplete_profile_lists_missing_fields() {
        let err = BookingError::IncompleteGuestProfile {
            missing: vec!["name", "mobile"],
        };
        assert_eq!(
            err.to_string(),
            "incomplete guest profile, missing: name, mobile"
        );
    }
}
