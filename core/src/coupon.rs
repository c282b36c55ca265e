//! Coupon validation.
//!
//! Validation is read-only: it never reserves or decrements anything.
//! Redemption — the one-time quantity decrement — happens only inside the
//! booking ledger's commit, so a coupon is never spent without a completed
//! booking.

use crate::types::Coupon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a coupon cannot be used.
///
/// Rejections are a pure function of coupon state and the clock, so
/// re-validating an expired or exhausted coupon always yields the same
/// rejection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponRejection {
    /// No coupon with this code exists.
    #[error("coupon code does not exist")]
    NotFound,

    /// Staff retired the coupon.
    #[error("coupon is inactive")]
    Inactive,

    /// The activity window has passed.
    #[error("coupon has expired")]
    Expired,

    /// All redemptions have been used.
    #[error("coupon is exhausted")]
    Exhausted,
}

/// A coupon that passed validation at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidCoupon {
    /// Discount to apply, in percent
    pub percent: u8,
    /// Redemptions left before the coupon exhausts
    pub remaining: u32,
}

impl Coupon {
    /// Validates this coupon for use at `now`.
    ///
    /// Rules are checked in order: active flag, expiry, remaining quantity.
    /// (Existence is the store's concern; an unknown code never reaches this
    /// method.)
    ///
    /// # Errors
    ///
    /// Returns the first applicable [`CouponRejection`].
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ValidCoupon, CouponRejection> {
        if !self.is_active {
            return Err(CouponRejection::Inactive);
        }
        if now > self.expires_at {
            return Err(CouponRejection::Expired);
        }
        if self.quantity == 0 {
            return Err(CouponRejection::Exhausted);
        }
        Ok(ValidCoupon {
            percent: self.percent,
            remaining: self.quantity,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::CouponId;
    use chrono::Duration;

    fn coupon(percent: u8, quantity: u32, active: bool, ttl_hours: i64) -> Coupon {
        Coupon {
            id: CouponId::new(),
            code: "WELCOME10".to_string(),
            percent,
            quantity,
            expires_at: Utc::now() + Duration::hours(ttl_hours),
            is_active: active,
        }
    }

    #[test]
    fn valid_coupon_reports_percent_and_remaining() {
        let valid = coupon(10, 5, true, 24).validate(Utc::now()).unwrap();
        assert_eq!(valid.percent, 10);
        assert_eq!(valid.remaining, 5);
    }

    #[test]
    fn inactive_beats_expired_beats_exhausted() {
        // All three conditions hold; the active flag is checked first.
        let dead = coupon(10, 0, false, -1);
        assert_eq!(dead.validate(Utc::now()), Err(CouponRejection::Inactive));

        // Expired and exhausted; expiry is checked before quantity.
        let expired = coupon(10, 0, true, -1);
        assert_eq!(expired.validate(Utc::now()), Err(CouponRejection::Expired));

        let exhausted = coupon(10, 0, true, 24);
        assert_eq!(
            exhausted.validate(Utc::now()),
            Err(CouponRejection::Exhausted)
        );
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let c = coupon(10, 1, true, 0);
        let at_expiry = c.expires_at;
        assert!(c.validate(at_expiry).is_ok());
        assert_eq!(
            c.validate(at_expiry + Duration::seconds(1)),
            Err(CouponRejection::Expired)
        );
    }

    #[test]
    fn rejection_is_idempotent() {
        let exhausted = coupon(15, 0, true, 24);
        let first = exhausted.validate(Utc::now());
        let second = exhausted.validate(Utc::now());
        assert_eq!(first, second);
        assert_eq!(first, Err(CouponRejection::Exhausted));
    }
}
