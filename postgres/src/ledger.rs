//! Transactional booking ledger.
//!
//! Booking creation runs as one atomic transaction spanning coupon
//! re-validation and decrement, the room status flip, and the booking
//! insert. Partial application of those three is the primary correctness
//! hazard, so every rejection path returns before commit and rolls the
//! whole transaction back.
//!
//! Mutual exclusion on a room comes from two layers: the `FOR UPDATE` row
//! lock taken while resolving the target, and the conditional status flip
//! (`WHERE room_status IN ('available','reserved') AND current_booking IS
//! NULL`) that fails closed if state moved underneath us. Coupon decrements
//! are the classic conditional update (`WHERE quantity > 0`), so quantity
//! can never go negative under concurrent redemptions.

use crate::bookings::{BOOKING_COLUMNS, BookingRow};
use crate::coupons::{COUPON_COLUMNS, CouponRow};
use crate::inventory::{ROOM_COLUMNS, RoomRow};
use crate::store_err;
use async_trait::async_trait;
use roomledger_core::coupon::CouponRejection;
use roomledger_core::error::{BookingError, Result};
use roomledger_core::ledger::{
    BookingLedger, BookingPatch, BookingRequest, check_capacity, check_room_assignable,
    validate_request,
};
use roomledger_core::pricing::{Discount, quote};
use roomledger_core::status::PaymentStatus;
use roomledger_core::store::Clock;
use roomledger_core::types::{Booking, BookingId, BookingTarget, Coupon, Money, Party};
use sqlx::{PgConnection, PgPool};
use std::sync::Arc;

/// PostgreSQL-backed booking ledger.
#[derive(Clone)]
pub struct PgBookingLedger {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgBookingLedger {
    /// Creates a ledger over the given pool and clock.
    #[must_use]
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// Pricing inputs resolved from the booking target.
struct ResolvedTarget {
    nightly_rate: Money,
    base_discount: u8,
}

async fn resolve_target(
    conn: &mut PgConnection,
    request: &BookingRequest,
) -> Result<ResolvedTarget> {
    match &request.target {
        BookingTarget::Room(number) => {
            let row: Option<RoomRow> = sqlx::query_as(&format!(
                "SELECT {ROOM_COLUMNS} FROM rooms WHERE room_number = $1 FOR UPDATE"
            ))
            .bind(number.as_str())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| store_err("lock room", &e))?;
            let room = row
                .ok_or(BookingError::NotFound { resource: "room" })?
                .into_domain()?;

            // Availability is decided before any pricing is computed.
            check_room_assignable(&room)?;
            check_capacity(room.capacity, request.room_count, request.guest_count)?;

            // Exact overlap re-check inside the transaction: the status flag
            // alone is not trusted, bookings are.
            let (overlaps,): (bool,) = sqlx::query_as(
                "SELECT EXISTS(
                     SELECT 1 FROM bookings
                     WHERE room_number = $1 AND check_in < $3 AND check_out > $2
                 )",
            )
            .bind(number.as_str())
            .bind(request.check_in)
            .bind(request.check_out)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| store_err("overlap check", &e))?;
            if overlaps {
                return Err(BookingError::RoomUnavailable);
            }

            Ok(ResolvedTarget {
                nightly_rate: room.nightly_rate,
                base_discount: room.discount_percent,
            })
        }
        BookingTarget::Accommodation(id) => {
            let row: Option<(i64, i32)> = sqlx::query_as(
                "SELECT base_price, max_adults FROM accommodations WHERE id = $1",
            )
            .bind(id.as_uuid())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| store_err("load accommodation", &e))?;
            let (base_price, max_adults) = row.ok_or(BookingError::NotFound {
                resource: "accommodation",
            })?;
            let max_adults =
                u32::try_from(max_adults).map_err(|_| crate::corrupt_row("max_adults"))?;
            check_capacity(max_adults, request.room_count, request.guest_count)?;
            Ok(ResolvedTarget {
                nightly_rate: Money::from_units(base_price),
                base_discount: 0,
            })
        }
    }
}

async fn lock_coupon(conn: &mut PgConnection, code: &str) -> Result<Coupon> {
    let row: Option<CouponRow> = sqlx::query_as(&format!(
        "SELECT {COUPON_COLUMNS} FROM coupons WHERE code = $1 FOR UPDATE"
    ))
    .bind(code)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| store_err("lock coupon", &e))?;
    row.ok_or(BookingError::CouponRejected(CouponRejection::NotFound))?
        .into_domain()
}

async fn insert_booking(conn: &mut PgConnection, booking: &Booking) -> Result<()> {
    let (room_number, accommodation_id) = match &booking.target {
        BookingTarget::Room(number) => (Some(number.as_str()), None),
        BookingTarget::Accommodation(id) => (None, Some(*id.as_uuid())),
    };
    let (user_id, guest) = match &booking.party {
        Party::User(id) => (Some(*id.as_uuid()), None),
        Party::Guest(profile) => (None, Some(profile)),
    };
    sqlx::query(
        "INSERT INTO bookings (id, room_number, accommodation_id, user_id,
             guest_name, guest_age, guest_father_name, guest_address, guest_mobile,
             guest_nationality, guest_profession, guest_passport_or_nid, guest_type,
             guest_vehicle_number, check_in, check_out, guest_count, room_count,
             room_price, coupon_percent, total_price, payment_status, booking_kind,
             coupon_id, employee_id, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                 $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26)",
    )
    .bind(booking.id.as_uuid())
    .bind(room_number)
    .bind(accommodation_id)
    .bind(user_id)
    .bind(guest.map(|g| g.name.as_str()))
    .bind(guest.map(|g| i64::from(g.age)))
    .bind(guest.map(|g| g.father_name.as_str()))
    .bind(guest.map(|g| g.address.as_str()))
    .bind(guest.map(|g| g.mobile.as_str()))
    .bind(guest.map(|g| g.nationality.as_str()))
    .bind(guest.map(|g| g.profession.as_str()))
    .bind(guest.map(|g| g.passport_or_nid.as_str()))
    .bind(guest.map(|g| g.guest_type.as_str()))
    .bind(guest.and_then(|g| g.vehicle_number.as_deref()))
    .bind(booking.check_in)
    .bind(booking.check_out)
    .bind(i64::from(booking.guest_count))
    .bind(i64::from(booking.room_count))
    .bind(booking.room_price.as_units())
    .bind(booking.coupon_percent.map(i16::from))
    .bind(booking.total_price.as_units())
    .bind(booking.payment_status.as_str())
    .bind(booking.booking_kind.as_str())
    .bind(booking.coupon.map(|id| *id.as_uuid()))
    .bind(booking.employee.map(|id| *id.as_uuid()))
    .bind(booking.created_at)
    .execute(conn)
    .await
    .map_err(|e| store_err("insert booking", &e))?;
    Ok(())
}

#[async_trait]
impl BookingLedger for PgBookingLedger {
    async fn create_booking(&self, request: BookingRequest) -> Result<Booking> {
        validate_request(&request, self.clock.today())?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_err("begin", &e))?;

        let target = resolve_target(&mut *tx, &request).await?;

        // Re-validate the coupon inside the transaction so the decision and
        // the decrement cannot race apart.
        let coupon = match &request.coupon_code {
            Some(code) => {
                let coupon = lock_coupon(&mut *tx, code).await?;
                coupon
                    .validate(self.clock.now())
                    .map_err(BookingError::CouponRejected)?;
                Some(coupon)
            }
            None => None,
        };

        let discount = Discount::select(
            coupon.as_ref().map(|c| c.percent),
            target.base_discount,
        );
        let priced = quote(
            target.nightly_rate,
            request.check_in,
            request.check_out,
            request.room_count,
            discount,
        )?;

        let booking = Booking {
            id: BookingId::new(),
            target: request.target.clone(),
            party: request.party.clone(),
            check_in: request.check_in,
            check_out: request.check_out,
            guest_count: request.guest_count,
            room_count: request.room_count,
            room_price: target.nightly_rate,
            coupon_percent: match discount {
                Discount::Coupon(percent) => Some(percent),
                Discount::Base(_) | Discount::None => None,
            },
            total_price: priced.total,
            payment_status: PaymentStatus::Pending,
            booking_kind: request.booking_kind,
            coupon: coupon.as_ref().map(|c| c.id),
            employee: request.employee,
            created_at: self.clock.now(),
        };
        insert_booking(&mut *tx, &booking).await?;

        if let BookingTarget::Room(number) = &request.target {
            let flipped = sqlx::query(
                "UPDATE rooms SET room_status = 'occupied', current_booking = $2
                 WHERE room_number = $1
                   AND room_status IN ('available', 'reserved')
                   AND current_booking IS NULL",
            )
            .bind(number.as_str())
            .bind(booking.id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| store_err("occupy room", &e))?;
            if flipped.rows_affected() == 0 {
                return Err(BookingError::RoomUnavailable);
            }
        }

        if let Some(coupon) = &coupon {
            let decremented = sqlx::query(
                "UPDATE coupons SET quantity = quantity - 1 WHERE id = $1 AND quantity > 0",
            )
            .bind(coupon.id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| store_err("redeem coupon", &e))?;
            if decremented.rows_affected() == 0 {
                return Err(BookingError::CouponNoLongerValid {
                    reason: CouponRejection::Exhausted,
                });
            }
        }

        tx.commit().await.map_err(|e| store_err("commit", &e))?;

        tracing::info!(
            booking = %booking.id,
            total = %booking.total_price,
            nights = priced.nights,
            "booking created"
        );
        Ok(booking)
    }

    async fn update_booking(&self, id: BookingId, patch: BookingPatch) -> Result<Booking> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_err("begin", &e))?;

        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| store_err("lock booking", &e))?;
        let mut booking = row
            .ok_or(BookingError::NotFound {
                resource: "booking",
            })?
            .into_domain()?;

        if let Some(to) = patch.payment_status {
            booking.payment_status = booking.payment_status.transition(to)?;
        }
        if let Some(employee) = patch.employee {
            booking.employee = Some(employee);
        }

        sqlx::query("UPDATE bookings SET payment_status = $2, employee_id = $3 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(booking.payment_status.as_str())
            .bind(booking.employee.map(|e| *e.as_uuid()))
            .execute(&mut *tx)
            .await
            .map_err(|e| store_err("update booking", &e))?;
        tx.commit().await.map_err(|e| store_err("commit", &e))?;

        Ok(booking)
    }

    async fn cancel_booking(&self, id: BookingId) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_err("begin", &e))?;

        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| store_err("lock booking", &e))?;
        let booking = row
            .ok_or(BookingError::NotFound {
                resource: "booking",
            })?
            .into_domain()?;

        // Release the held room before deleting the row it points at.
        // The coupon is deliberately not refunded.
        if let BookingTarget::Room(number) = &booking.target {
            sqlx::query(
                "UPDATE rooms
                 SET room_status = 'available', current_booking = NULL,
                     housekeeping_status = 'waiting_for_clean'
                 WHERE room_number = $1 AND current_booking = $2",
            )
            .bind(number.as_str())
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| store_err("release room", &e))?;
        }

        sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| store_err("delete booking", &e))?;
        tx.commit().await.map_err(|e| store_err("commit", &e))?;

        tracing::info!(booking = %id, "booking cancelled");
        Ok(())
    }
}
