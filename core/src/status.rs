//! Status enums and their transition tables.
//!
//! Room, housekeeping, and payment states change only through the explicit
//! transition tables here. Illegal transitions (double-occupying a room,
//! un-paying a paid booking) are rejected before anything is persisted.

use crate::error::{BookingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Occupancy state of a physical room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Free to assign
    Available,
    /// Held by an active booking
    Occupied,
    /// Out of service; cannot be booked
    Maintenance,
    /// Soft hold by the front desk; still bookable
    Reserved,
}

impl RoomStatus {
    /// Returns whether the transition `self -> to` is legal.
    ///
    /// Occupied -> Occupied is deliberately absent: a second occupation of a
    /// held room must fail, not overwrite.
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Available, Self::Occupied | Self::Reserved | Self::Maintenance)
                | (Self::Reserved, Self::Occupied | Self::Available | Self::Maintenance)
                | (Self::Occupied, Self::Available | Self::Maintenance)
                | (Self::Maintenance, Self::Available)
        )
    }

    /// Validates the transition `self -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::IllegalTransition`] if the transition table
    /// does not permit it.
    pub fn transition(self, to: Self) -> Result<Self> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(BookingError::IllegalTransition {
                entity: "room",
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }

    /// Canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
            Self::Reserved => "reserved",
        }
    }

    /// Parses the canonical string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            "maintenance" => Some(Self::Maintenance),
            "reserved" => Some(Self::Reserved),
            _ => None,
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Housekeeping state of a room, independent of occupancy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousekeepingStatus {
    /// Ready for the next guest
    Clean,
    /// Queued for cleaning after checkout
    WaitingForClean,
    /// Flagged for maintenance attention
    NeedsService,
}

impl HousekeepingStatus {
    /// Returns whether the transition `self -> to` is legal.
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        !matches!(
            (self, to),
            (Self::Clean, Self::Clean)
                | (Self::WaitingForClean, Self::WaitingForClean)
                | (Self::NeedsService, Self::NeedsService)
        )
    }

    /// Validates the transition `self -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::IllegalTransition`] for self-transitions.
    pub fn transition(self, to: Self) -> Result<Self> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(BookingError::IllegalTransition {
                entity: "housekeeping",
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }

    /// Canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::WaitingForClean => "waiting_for_clean",
            Self::NeedsService => "needs_service",
        }
    }

    /// Parses the canonical string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "clean" => Some(Self::Clean),
            "waiting_for_clean" => Some(Self::WaitingForClean),
            "needs_service" => Some(Self::NeedsService),
            _ => None,
        }
    }
}

impl fmt::Display for HousekeepingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment lifecycle of a booking.
///
/// Moves forward only: pending -> partial -> paid, with pending -> paid
/// allowed for single-settlement payments. No transition leaves `Paid`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing received yet
    Pending,
    /// Deposit received
    Partial,
    /// Settled in full
    Paid,
}

impl PaymentStatus {
    /// Returns whether the transition `self -> to` is legal.
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Partial | Self::Paid) | (Self::Partial, Self::Paid)
        )
    }

    /// Validates the transition `self -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::IllegalTransition`] for backward or repeated
    /// transitions.
    pub fn transition(self, to: Self) -> Result<Self> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(BookingError::IllegalTransition {
                entity: "payment",
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }

    /// Canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }

    /// Parses the canonical string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "partial" => Some(Self::Partial),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a booking was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    /// Self-service through the public API
    Online,
    /// Entered by staff at the front desk
    Offline,
}

impl BookingKind {
    /// Canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }

    /// Parses the canonical string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(Self::Online),
            "offline" => Some(Self::Offline),
            _ => None,
        }
    }
}

impl fmt::Display for BookingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn room_transitions_follow_table() {
        assert!(RoomStatus::Available.can_transition(RoomStatus::Occupied));
        assert!(RoomStatus::Available.can_transition(RoomStatus::Reserved));
        assert!(RoomStatus::Reserved.can_transition(RoomStatus::Occupied));
        assert!(RoomStatus::Occupied.can_transition(RoomStatus::Available));
        assert!(RoomStatus::Maintenance.can_transition(RoomStatus::Available));
    }

    #[test]
    fn room_double_occupation_is_illegal() {
        assert!(!RoomStatus::Occupied.can_transition(RoomStatus::Occupied));
        let err = RoomStatus::Occupied
            .transition(RoomStatus::Occupied)
            .unwrap_err();
        assert!(matches!(err, BookingError::IllegalTransition { .. }));
    }

    #[test]
    fn maintenance_room_cannot_be_occupied_directly() {
        assert!(!RoomStatus::Maintenance.can_transition(RoomStatus::Occupied));
        assert!(!RoomStatus::Maintenance.can_transition(RoomStatus::Reserved));
    }

    #[test]
    fn payment_only_moves_forward() {
        assert!(PaymentStatus::Pending.can_transition(PaymentStatus::Partial));
        assert!(PaymentStatus::Pending.can_transition(PaymentStatus::Paid));
        assert!(PaymentStatus::Partial.can_transition(PaymentStatus::Paid));
        assert!(!PaymentStatus::Paid.can_transition(PaymentStatus::Pending));
        assert!(!PaymentStatus::Paid.can_transition(PaymentStatus::Partial));
        assert!(!PaymentStatus::Partial.can_transition(PaymentStatus::Pending));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            RoomStatus::Available,
            RoomStatus::Occupied,
            RoomStatus::Maintenance,
            RoomStatus::Reserved,
        ] {
            assert_eq!(RoomStatus::parse(status.as_str()), Some(status));
        }
        for status in [
            HousekeepingStatus::Clean,
            HousekeepingStatus::WaitingForClean,
            HousekeepingStatus::NeedsService,
        ] {
            assert_eq!(HousekeepingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RoomStatus::parse("unknown"), None);
    }
}
