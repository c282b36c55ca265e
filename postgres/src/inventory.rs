//! PostgreSQL inventory store.
//!
//! Rooms and accommodation listings. Availability uses the exact date-range
//! overlap predicate against active bookings, never the status flag alone,
//! so a lagging status update cannot cause a double booking.

use crate::{corrupt_row, store_err};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roomledger_core::error::{BookingError, Result};
use roomledger_core::status::{HousekeepingStatus, RoomStatus};
use roomledger_core::store::{AvailabilityFilter, InventoryStore};
use roomledger_core::types::{
    Accommodation, AccommodationId, BookingId, Money, Room, RoomId, RoomNumber,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Raw `rooms` row before domain conversion.
#[derive(sqlx::FromRow)]
pub(crate) struct RoomRow {
    pub id: Uuid,
    pub room_number: String,
    pub floor: i16,
    pub capacity: i32,
    pub room_type: String,
    pub nightly_rate: i64,
    pub discount_percent: i16,
    pub room_status: String,
    pub housekeeping_status: String,
    pub current_booking: Option<Uuid>,
}

pub(crate) const ROOM_COLUMNS: &str = "id, room_number, floor, capacity, room_type, \
     nightly_rate, discount_percent, room_status, housekeeping_status, current_booking";

impl RoomRow {
    pub(crate) fn into_domain(self) -> Result<Room> {
        let room_status = RoomStatus::parse(&self.room_status)
            .ok_or_else(|| corrupt_row("unknown room_status"))?;
        let housekeeping_status = HousekeepingStatus::parse(&self.housekeeping_status)
            .ok_or_else(|| corrupt_row("unknown housekeeping_status"))?;
        Ok(Room {
            id: RoomId::from_uuid(self.id),
            room_number: RoomNumber::new(self.room_number),
            floor: self.floor,
            capacity: u32::try_from(self.capacity).map_err(|_| corrupt_row("capacity"))?,
            room_type: self.room_type,
            nightly_rate: Money::from_units(self.nightly_rate),
            discount_percent: u8::try_from(self.discount_percent)
                .map_err(|_| corrupt_row("discount_percent"))?,
            room_status,
            housekeeping_status,
            current_booking: self.current_booking.map(BookingId::from_uuid),
        })
    }
}

/// Raw `accommodations` row before domain conversion.
#[derive(sqlx::FromRow)]
pub(crate) struct AccommodationRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub base_price: i64,
    pub max_adults: i32,
    pub specs: Vec<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl AccommodationRow {
    pub(crate) fn into_domain(self) -> Result<Accommodation> {
        Ok(Accommodation {
            id: AccommodationId::from_uuid(self.id),
            title: self.title,
            description: self.description,
            base_price: Money::from_units(self.base_price),
            max_adults: u32::try_from(self.max_adults).map_err(|_| corrupt_row("max_adults"))?,
            specs: self.specs,
            images: self.images,
            created_at: self.created_at,
        })
    }
}

/// PostgreSQL-backed inventory store.
#[derive(Clone)]
pub struct PgInventoryStore {
    pool: PgPool,
}

impl PgInventoryStore {
    /// Creates a store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    async fn find_room(&self, number: &RoomNumber) -> Result<Room> {
        let row: Option<RoomRow> = sqlx::query_as(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE room_number = $1"
        ))
        .bind(number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("find_room", &e))?;
        row.ok_or(BookingError::NotFound { resource: "room" })?
            .into_domain()
    }

    async fn find_accommodation(&self, id: AccommodationId) -> Result<Accommodation> {
        let row: Option<AccommodationRow> = sqlx::query_as(
            "SELECT id, title, description, base_price, max_adults, specs, images, created_at
             FROM accommodations WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("find_accommodation", &e))?;
        row.ok_or(BookingError::NotFound {
            resource: "accommodation",
        })?
        .into_domain()
    }

    async fn list_available(&self, filter: &AvailabilityFilter) -> Result<Vec<Room>> {
        // The overlap test (existing check_in < requested check_out AND
        // existing check_out > requested check_in) is the correctness-
        // critical part; status only pre-filters maintenance rooms.
        let rows: Vec<RoomRow> = sqlx::query_as(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r
             WHERE r.room_status <> 'maintenance'
               AND NOT EXISTS (
                   SELECT 1 FROM bookings b
                   WHERE b.room_number = r.room_number
                     AND b.check_in < $2
                     AND b.check_out > $1
               )
               AND ($3::smallint IS NULL OR r.floor = $3)
               AND ($4::text IS NULL OR r.room_type = $4)
               AND ($5::bigint IS NULL OR r.capacity >= $5)
             ORDER BY r.room_number"
        ))
        .bind(filter.check_in)
        .bind(filter.check_out)
        .bind(filter.floor)
        .bind(filter.room_type.as_deref())
        .bind(filter.min_capacity.map(i64::from))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_err("list_available", &e))?;
        rows.into_iter().map(RoomRow::into_domain).collect()
    }

    async fn create_room(&self, room: &Room) -> Result<()> {
        sqlx::query(
            "INSERT INTO rooms (id, room_number, floor, capacity, room_type, nightly_rate,
                                discount_percent, room_status, housekeeping_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(room.id.as_uuid())
        .bind(room.room_number.as_str())
        .bind(room.floor)
        .bind(i64::from(room.capacity))
        .bind(&room.room_type)
        .bind(room.nightly_rate.as_units())
        .bind(i16::from(room.discount_percent))
        .bind(room.room_status.as_str())
        .bind(room.housekeeping_status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return BookingError::Store("room number already exists".to_string());
                }
            }
            store_err("create_room", &e)
        })?;
        Ok(())
    }

    async fn set_room_status(&self, number: &RoomNumber, to: RoomStatus) -> Result<Room> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_err("set_room_status: begin", &e))?;

        let row: Option<RoomRow> = sqlx::query_as(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE room_number = $1 FOR UPDATE"
        ))
        .bind(number.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| store_err("set_room_status: lock", &e))?;
        let room = row
            .ok_or(BookingError::NotFound { resource: "room" })?
            .into_domain()?;

        room.room_status.transition(to)?;

        sqlx::query("UPDATE rooms SET room_status = $2 WHERE room_number = $1")
            .bind(number.as_str())
            .bind(to.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| store_err("set_room_status: update", &e))?;
        tx.commit()
            .await
            .map_err(|e| store_err("set_room_status: commit", &e))?;

        tracing::info!(room = %number, from = %room.room_status, to = %to, "room status changed");
        Ok(Room {
            room_status: to,
            ..room
        })
    }

    async fn set_housekeeping_status(
        &self,
        number: &RoomNumber,
        to: HousekeepingStatus,
    ) -> Result<Room> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_err("set_housekeeping_status: begin", &e))?;

        let row: Option<RoomRow> = sqlx::query_as(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE room_number = $1 FOR UPDATE"
        ))
        .bind(number.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| store_err("set_housekeeping_status: lock", &e))?;
        let room = row
            .ok_or(BookingError::NotFound { resource: "room" })?
            .into_domain()?;

        room.housekeeping_status.transition(to)?;

        sqlx::query("UPDATE rooms SET housekeeping_status = $2 WHERE room_number = $1")
            .bind(number.as_str())
            .bind(to.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| store_err("set_housekeeping_status: update", &e))?;
        tx.commit()
            .await
            .map_err(|e| store_err("set_housekeeping_status: commit", &e))?;

        Ok(Room {
            housekeeping_status: to,
            ..room
        })
    }

    async fn create_accommodation(&self, accommodation: &Accommodation) -> Result<()> {
        sqlx::query(
            "INSERT INTO accommodations (id, title, description, base_price, max_adults,
                                         specs, images, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(accommodation.id.as_uuid())
        .bind(&accommodation.title)
        .bind(&accommodation.description)
        .bind(accommodation.base_price.as_units())
        .bind(i64::from(accommodation.max_adults))
        .bind(&accommodation.specs)
        .bind(&accommodation.images)
        .bind(accommodation.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("create_accommodation", &e))?;
        Ok(())
    }

    async fn list_accommodations(&self) -> Result<Vec<Accommodation>> {
        let rows: Vec<AccommodationRow> = sqlx::query_as(
            "SELECT id, title, description, base_price, max_adults, specs, images, created_at
             FROM accommodations ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_err("list_accommodations", &e))?;
        rows.into_iter().map(AccommodationRow::into_domain).collect()
    }

    async fn update_accommodation(&self, accommodation: &Accommodation) -> Result<()> {
        let result = sqlx::query(
            "UPDATE accommodations
             SET title = $2, description = $3, base_price = $4, max_adults = $5,
                 specs = $6, images = $7
             WHERE id = $1",
        )
        .bind(accommodation.id.as_uuid())
        .bind(&accommodation.title)
        .bind(&accommodation.description)
        .bind(accommodation.base_price.as_units())
        .bind(i64::from(accommodation.max_adults))
        .bind(&accommodation.specs)
        .bind(&accommodation.images)
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("update_accommodation", &e))?;
        if result.rows_affected() == 0 {
            return Err(BookingError::NotFound {
                resource: "accommodation",
            });
        }
        Ok(())
    }
}
