//! Pricing calculator.
//!
//! Derives a total for a stay from the nightly rate, the night count, the
//! room count, and at most one discount. Currency amounts round to the
//! nearest whole unit; there is no sub-unit currency in this domain.

use crate::error::{BookingError, Result};
use crate::types::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single discount applied to a stay.
///
/// A coupon supersedes the room's base discount; the two are never composed.
/// [`Discount::select`] encodes that business rule in one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discount {
    /// No discount applies
    None,
    /// The room's own discount, in percent
    Base(u8),
    /// A validated coupon's discount, in percent
    Coupon(u8),
}

impl Discount {
    /// Picks the discount for a stay: the coupon when one is present,
    /// otherwise the room's base discount, otherwise none.
    #[must_use]
    pub const fn select(coupon_percent: Option<u8>, base_percent: u8) -> Self {
        match coupon_percent {
            Some(percent) => Self::Coupon(percent),
            None if base_percent > 0 => Self::Base(base_percent),
            None => Self::None,
        }
    }

    /// The percentage this discount takes off the subtotal.
    #[must_use]
    pub const fn effective_percent(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Base(percent) | Self::Coupon(percent) => percent,
        }
    }
}

/// The priced breakdown of a stay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Number of nights, always at least 1
    pub nights: u32,
    /// `nightly_rate x nights x room_count`
    pub subtotal: Money,
    /// Amount taken off the subtotal, rounded to the nearest unit
    pub discount_amount: Money,
    /// `subtotal - discount_amount`, never negative
    pub total: Money,
}

/// Prices a stay.
///
/// # Errors
///
/// Returns [`BookingError::InvalidDateRange`] when `check_out` is not after
/// `check_in`, [`BookingError::NoRooms`] when `room_count` is zero, and
/// [`BookingError::Store`] on arithmetic overflow (rates and stays that
/// overflow `i64` are not representable bookings).
pub fn quote(
    nightly_rate: Money,
    check_in: NaiveDate,
    check_out: NaiveDate,
    room_count: u32,
    discount: Discount,
) -> Result<Quote> {
    let nights = (check_out - check_in).num_days();
    if nights < 1 {
        return Err(BookingError::InvalidDateRange);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nights = nights as u32;

    if room_count == 0 {
        return Err(BookingError::NoRooms);
    }

    let subtotal = nightly_rate
        .checked_mul(nights)
        .and_then(|per_room| per_room.checked_mul(room_count))
        .ok_or_else(|| BookingError::Store("price overflow".to_string()))?;

    let discount_amount = subtotal.percent_of(discount.effective_percent());
    let total = subtotal.saturating_sub(discount_amount);

    Ok(Quote {
        nights,
        subtotal,
        discount_amount,
        total,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn three_nights_one_room_no_coupon() {
        let q = quote(
            Money::from_units(3000),
            date(2025, 3, 1),
            date(2025, 3, 4),
            1,
            Discount::None,
        )
        .unwrap();
        assert_eq!(q.nights, 3);
        assert_eq!(q.subtotal, Money::from_units(9000));
        assert_eq!(q.discount_amount, Money::ZERO);
        assert_eq!(q.total, Money::from_units(9000));
    }

    #[test]
    fn ten_percent_coupon_takes_900_off_9000() {
        let q = quote(
            Money::from_units(3000),
            date(2025, 3, 1),
            date(2025, 3, 4),
            1,
            Discount::Coupon(10),
        )
        .unwrap();
        assert_eq!(q.discount_amount, Money::from_units(900));
        assert_eq!(q.total, Money::from_units(8100));
    }

    #[test]
    fn check_in_equal_to_check_out_is_rejected() {
        let d = date(2025, 3, 1);
        assert_eq!(
            quote(Money::from_units(3000), d, d, 1, Discount::None),
            Err(BookingError::InvalidDateRange)
        );
    }

    #[test]
    fn reversed_dates_are_rejected() {
        assert_eq!(
            quote(
                Money::from_units(3000),
                date(2025, 3, 4),
                date(2025, 3, 1),
                1,
                Discount::None
            ),
            Err(BookingError::InvalidDateRange)
        );
    }

    #[test]
    fn coupon_supersedes_base_discount() {
        // Base 20% on the room, coupon 10%: only the coupon applies.
        assert_eq!(Discount::select(Some(10), 20), Discount::Coupon(10));
        assert_eq!(Discount::select(None, 20), Discount::Base(20));
        assert_eq!(Discount::select(None, 0), Discount::None);
    }

    #[test]
    fn full_discount_clamps_at_zero() {
        let q = quote(
            Money::from_units(100),
            date(2025, 3, 1),
            date(2025, 3, 2),
            1,
            Discount::Coupon(100),
        )
        .unwrap();
        assert_eq!(q.total, Money::ZERO);
    }

    #[test]
    fn multiple_rooms_scale_the_subtotal() {
        let q = quote(
            Money::from_units(1500),
            date(2025, 3, 1),
            date(2025, 3, 3),
            3,
            Discount::None,
        )
        .unwrap();
        assert_eq!(q.subtotal, Money::from_units(9000));
    }

    #[test]
    fn extreme_nightly_rate_keeps_the_discount_non_negative() {
        // One night at the largest representable rate: the discount must
        // stay within the subtotal rather than wrapping negative.
        let q = quote(
            Money::from_units(i64::MAX),
            date(2025, 3, 1),
            date(2025, 3, 2),
            1,
            Discount::Coupon(37),
        )
        .unwrap();
        assert!(q.discount_amount.as_units() > 0);
        assert!(q.total <= q.subtotal);
    }

    proptest! {
        #[test]
        fn total_never_exceeds_subtotal(
            rate in 0i64..1_000_000,
            nights in 1u32..365,
            rooms in 1u32..10,
            percent in 0u8..=100,
        ) {
            let check_in = date(2025, 1, 1);
            let check_out = check_in + chrono::Duration::days(i64::from(nights));
            let q = quote(
                Money::from_units(rate),
                check_in,
                check_out,
                rooms,
                Discount::Coupon(percent),
            )
            .unwrap();
            prop_assert!(q.nights >= 1);
            prop_assert!(q.total <= q.subtotal);
            prop_assert!(q.total.as_units() >= 0);
            prop_assert_eq!(
                q.total,
                q.subtotal.saturating_sub(q.discount_amount)
            );
        }
    }
}
