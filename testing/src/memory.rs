//! In-memory store implementing every persistence trait.
//!
//! One mutex guards all tables, mirroring the serialization the relational
//! store provides through transactions. The [`crate::MemoryLedger`] holds
//! that same lock across a whole commit, which is what makes its bookings
//! atomic.

use async_trait::async_trait;
use roomledger_core::error::{BookingError, Result};
use roomledger_core::status::{HousekeepingStatus, RoomStatus};
use roomledger_core::store::{
    AvailabilityFilter, BookingStore, CouponStore, InventoryStore, UserStore, stays_overlap,
};
use roomledger_core::types::{
    Accommodation, AccommodationId, Booking, BookingId, BookingTarget, Coupon, Room, RoomNumber,
    User, UserId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// All tables behind one lock.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub rooms: HashMap<String, Room>,
    pub accommodations: HashMap<AccommodationId, Accommodation>,
    pub coupons: HashMap<String, Coupon>,
    pub users: HashMap<UserId, User>,
    pub bookings: HashMap<BookingId, Booking>,
}

impl Tables {
    /// Active bookings for a room that overlap the given stay.
    pub fn overlapping(
        &self,
        room: &RoomNumber,
        check_in: chrono::NaiveDate,
        check_out: chrono::NaiveDate,
    ) -> Vec<&Booking> {
        self.bookings
            .values()
            .filter(|b| match &b.target {
                BookingTarget::Room(number) => {
                    number == room && stays_overlap(b.check_in, b.check_out, check_in, check_out)
                }
                BookingTarget::Accommodation(_) => false,
            })
            .collect()
    }
}

/// In-memory store for tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.inner
            .lock()
            .map_err(|_| BookingError::Store("lock poisoned".to_string()))
    }

    /// Seeds a room, replacing any existing one with the same number.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn seed_room(&self, room: Room) {
        self.lock()
            .unwrap()
            .rooms
            .insert(room.room_number.as_str().to_string(), room);
    }

    /// Seeds an accommodation listing.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn seed_accommodation(&self, accommodation: Accommodation) {
        self.lock()
            .unwrap()
            .accommodations
            .insert(accommodation.id, accommodation);
    }

    /// Seeds a coupon.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn seed_coupon(&self, coupon: Coupon) {
        self.lock()
            .unwrap()
            .coupons
            .insert(coupon.code.clone(), coupon);
    }

    /// Seeds a user.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn seed_user(&self, user: User) {
        self.lock().unwrap().users.insert(user.id, user);
    }

    /// Snapshot of a coupon's remaining quantity, for assertions.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn coupon_quantity(&self, code: &str) -> Option<u32> {
        self.lock().unwrap().coupons.get(code).map(|c| c.quantity)
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn find_room(&self, number: &RoomNumber) -> Result<Room> {
        self.lock()?
            .rooms
            .get(number.as_str())
            .cloned()
            .ok_or(BookingError::NotFound { resource: "room" })
    }

    async fn find_accommodation(&self, id: AccommodationId) -> Result<Accommodation> {
        self.lock()?
            .accommodations
            .get(&id)
            .cloned()
            .ok_or(BookingError::NotFound {
                resource: "accommodation",
            })
    }

    async fn list_available(&self, filter: &AvailabilityFilter) -> Result<Vec<Room>> {
        let tables = self.lock()?;
        let mut rooms: Vec<Room> = tables
            .rooms
            .values()
            .filter(|room| room.room_status != RoomStatus::Maintenance)
            .filter(|room| {
                tables
                    .overlapping(&room.room_number, filter.check_in, filter.check_out)
                    .is_empty()
            })
            .filter(|room| filter.floor.is_none_or(|floor| room.floor == floor))
            .filter(|room| {
                filter
                    .room_type
                    .as_ref()
                    .is_none_or(|ty| &room.room_type == ty)
            })
            .filter(|room| {
                filter
                    .min_capacity
                    .is_none_or(|min| room.capacity >= min)
            })
            .cloned()
            .collect();
        rooms.sort_by(|a, b| a.room_number.as_str().cmp(b.room_number.as_str()));
        Ok(rooms)
    }

    async fn create_room(&self, room: &Room) -> Result<()> {
        let mut tables = self.lock()?;
        if tables.rooms.contains_key(room.room_number.as_str()) {
            return Err(BookingError::Store(
                "room number already exists".to_string(),
            ));
        }
        tables
            .rooms
            .insert(room.room_number.as_str().to_string(), room.clone());
        Ok(())
    }

    async fn set_room_status(&self, number: &RoomNumber, to: RoomStatus) -> Result<Room> {
        let mut tables = self.lock()?;
        let room = tables
            .rooms
            .get_mut(number.as_str())
            .ok_or(BookingError::NotFound { resource: "room" })?;
        room.room_status = room.room_status.transition(to)?;
        Ok(room.clone())
    }

    async fn set_housekeeping_status(
        &self,
        number: &RoomNumber,
        to: HousekeepingStatus,
    ) -> Result<Room> {
        let mut tables = self.lock()?;
        let room = tables
            .rooms
            .get_mut(number.as_str())
            .ok_or(BookingError::NotFound { resource: "room" })?;
        room.housekeeping_status = room.housekeeping_status.transition(to)?;
        Ok(room.clone())
    }

    async fn create_accommodation(&self, accommodation: &Accommodation) -> Result<()> {
        self.lock()?
            .accommodations
            .insert(accommodation.id, accommodation.clone());
        Ok(())
    }

    async fn list_accommodations(&self) -> Result<Vec<Accommodation>> {
        let tables = self.lock()?;
        let mut listings: Vec<Accommodation> = tables.accommodations.values().cloned().collect();
        listings.sort_by_key(|a| a.created_at);
        Ok(listings)
    }

    async fn update_accommodation(&self, accommodation: &Accommodation) -> Result<()> {
        let mut tables = self.lock()?;
        if !tables.accommodations.contains_key(&accommodation.id) {
            return Err(BookingError::NotFound {
                resource: "accommodation",
            });
        }
        tables
            .accommodations
            .insert(accommodation.id, accommodation.clone());
        Ok(())
    }
}

#[async_trait]
impl CouponStore for MemoryStore {
    async fn find_by_code(&self, code: &str) -> Result<Coupon> {
        self.lock()?
            .coupons
            .get(code)
            .cloned()
            .ok_or(BookingError::NotFound { resource: "coupon" })
    }

    async fn create(&self, coupon: &Coupon) -> Result<()> {
        let mut tables = self.lock()?;
        if tables.coupons.contains_key(&coupon.code) {
            return Err(BookingError::Store(
                "coupon code already exists".to_string(),
            ));
        }
        tables.coupons.insert(coupon.code.clone(), coupon.clone());
        Ok(())
    }

    async fn deactivate(&self, code: &str) -> Result<()> {
        let mut tables = self.lock()?;
        let coupon = tables
            .coupons
            .get_mut(code)
            .ok_or(BookingError::NotFound { resource: "coupon" })?;
        coupon.is_active = false;
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: &User) -> Result<()> {
        let mut tables = self.lock()?;
        if tables.users.values().any(|u| u.phone == user.phone) {
            return Err(BookingError::PhoneAlreadyRegistered);
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<User> {
        self.lock()?
            .users
            .get(&id)
            .cloned()
            .ok_or(BookingError::NotFound { resource: "user" })
    }

    async fn find_by_phone(&self, phone: &str) -> Result<User> {
        self.lock()?
            .users
            .values()
            .find(|u| u.phone == phone)
            .cloned()
            .ok_or(BookingError::NotFound { resource: "user" })
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn find(&self, id: BookingId) -> Result<Booking> {
        self.lock()?
            .bookings
            .get(&id)
            .cloned()
            .ok_or(BookingError::NotFound {
                resource: "booking",
            })
    }

    async fn list_overlapping(
        &self,
        room: &RoomNumber,
        check_in: chrono::NaiveDate,
        check_out: chrono::NaiveDate,
    ) -> Result<Vec<Booking>> {
        let tables = self.lock()?;
        let mut bookings: Vec<Booking> = tables
            .overlapping(room, check_in, check_out)
            .into_iter()
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.check_in);
        Ok(bookings)
    }
}
