//! PostgreSQL booking read store.

use crate::{corrupt_row, store_err};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use roomledger_core::error::{BookingError, Result};
use roomledger_core::status::{BookingKind, PaymentStatus};
use roomledger_core::store::BookingStore;
use roomledger_core::types::{
    AccommodationId, Booking, BookingId, BookingTarget, CouponId, EmployeeId, GuestProfile, Money,
    Party, RoomNumber, UserId,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Raw `bookings` row before domain conversion.
#[derive(sqlx::FromRow)]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub room_number: Option<String>,
    pub accommodation_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub guest_name: Option<String>,
    pub guest_age: Option<i32>,
    pub guest_father_name: Option<String>,
    pub guest_address: Option<String>,
    pub guest_mobile: Option<String>,
    pub guest_nationality: Option<String>,
    pub guest_profession: Option<String>,
    pub guest_passport_or_nid: Option<String>,
    pub guest_type: Option<String>,
    pub guest_vehicle_number: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: i32,
    pub room_count: i32,
    pub room_price: i64,
    pub coupon_percent: Option<i16>,
    pub total_price: i64,
    pub payment_status: String,
    pub booking_kind: String,
    pub coupon_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

pub(crate) const BOOKING_COLUMNS: &str = "id, room_number, accommodation_id, user_id, \
     guest_name, guest_age, guest_father_name, guest_address, guest_mobile, \
     guest_nationality, guest_profession, guest_passport_or_nid, guest_type, \
     guest_vehicle_number, check_in, check_out, guest_count, room_count, room_price, \
     coupon_percent, total_price, payment_status, booking_kind, coupon_id, employee_id, \
     created_at";

impl BookingRow {
    pub(crate) fn into_domain(self) -> Result<Booking> {
        let target = match (self.room_number, self.accommodation_id) {
            (Some(number), None) => BookingTarget::Room(RoomNumber::new(number)),
            (None, Some(id)) => BookingTarget::Accommodation(AccommodationId::from_uuid(id)),
            _ => return Err(corrupt_row("booking target")),
        };
        let party = if let Some(user_id) = self.user_id {
            Party::User(UserId::from_uuid(user_id))
        } else {
            Party::Guest(GuestProfile {
                name: self.guest_name.ok_or_else(|| corrupt_row("guest_name"))?,
                age: self
                    .guest_age
                    .and_then(|age| u32::try_from(age).ok())
                    .ok_or_else(|| corrupt_row("guest_age"))?,
                father_name: self
                    .guest_father_name
                    .ok_or_else(|| corrupt_row("guest_father_name"))?,
                address: self
                    .guest_address
                    .ok_or_else(|| corrupt_row("guest_address"))?,
                mobile: self
                    .guest_mobile
                    .ok_or_else(|| corrupt_row("guest_mobile"))?,
                nationality: self
                    .guest_nationality
                    .ok_or_else(|| corrupt_row("guest_nationality"))?,
                profession: self
                    .guest_profession
                    .ok_or_else(|| corrupt_row("guest_profession"))?,
                passport_or_nid: self
                    .guest_passport_or_nid
                    .ok_or_else(|| corrupt_row("guest_passport_or_nid"))?,
                guest_type: self.guest_type.ok_or_else(|| corrupt_row("guest_type"))?,
                vehicle_number: self.guest_vehicle_number,
            })
        };
        Ok(Booking {
            id: BookingId::from_uuid(self.id),
            target,
            party,
            check_in: self.check_in,
            check_out: self.check_out,
            guest_count: u32::try_from(self.guest_count).map_err(|_| corrupt_row("guest_count"))?,
            room_count: u32::try_from(self.room_count).map_err(|_| corrupt_row("room_count"))?,
            room_price: Money::from_units(self.room_price),
            coupon_percent: self
                .coupon_percent
                .map(|p| u8::try_from(p).map_err(|_| corrupt_row("coupon_percent")))
                .transpose()?,
            total_price: Money::from_units(self.total_price),
            payment_status: PaymentStatus::parse(&self.payment_status)
                .ok_or_else(|| corrupt_row("payment_status"))?,
            booking_kind: BookingKind::parse(&self.booking_kind)
                .ok_or_else(|| corrupt_row("booking_kind"))?,
            coupon: self.coupon_id.map(CouponId::from_uuid),
            employee: self.employee_id.map(EmployeeId::from_uuid),
            created_at: self.created_at,
        })
    }
}

/// PostgreSQL-backed booking read store.
#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    /// Creates a store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn find(&self, id: BookingId) -> Result<Booking> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("find booking", &e))?;
        row.ok_or(BookingError::NotFound {
            resource: "booking",
        })?
        .into_domain()
    }

    async fn list_overlapping(
        &self,
        room: &RoomNumber,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             WHERE room_number = $1 AND check_in < $3 AND check_out > $2
             ORDER BY check_in"
        ))
        .bind(room.as_str())
        .bind(check_in)
        .bind(check_out)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_err("list_overlapping", &e))?;
        rows.into_iter().map(BookingRow::into_domain).collect()
    }
}
