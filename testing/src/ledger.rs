//! In-memory booking ledger.
//!
//! Runs the same precondition pipeline as the Postgres ledger and commits
//! under the store's single lock, so a whole booking is one critical
//! section: concurrent requests for the same room serialize and at most one
//! can win.

use crate::clock::FixedClock;
use crate::memory::MemoryStore;
use async_trait::async_trait;
use roomledger_core::coupon::CouponRejection;
use roomledger_core::error::{BookingError, Result};
use roomledger_core::ledger::{
    BookingLedger, BookingPatch, BookingRequest, check_capacity, check_room_assignable,
    validate_request,
};
use roomledger_core::pricing::{Discount, quote};
use roomledger_core::status::{HousekeepingStatus, PaymentStatus, RoomStatus};
use roomledger_core::store::Clock;
use roomledger_core::types::{Booking, BookingId, BookingTarget};
use std::sync::Arc;

/// In-memory ledger over a [`MemoryStore`].
#[derive(Clone)]
pub struct MemoryLedger {
    store: MemoryStore,
    clock: Arc<FixedClock>,
}

impl MemoryLedger {
    /// Creates a ledger over the given store and clock.
    #[must_use]
    pub const fn new(store: MemoryStore, clock: Arc<FixedClock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl BookingLedger for MemoryLedger {
    async fn create_booking(&self, request: BookingRequest) -> Result<Booking> {
        validate_request(&request, self.clock.today())?;

        // One lock for the whole commit: resolve, validate, price, write.
        let mut tables = self.store.lock()?;

        let (nightly_rate, base_discount) = match &request.target {
            BookingTarget::Room(number) => {
                let room = tables
                    .rooms
                    .get(number.as_str())
                    .ok_or(BookingError::NotFound { resource: "room" })?;
                check_room_assignable(room)?;
                check_capacity(room.capacity, request.room_count, request.guest_count)?;
                if !tables
                    .overlapping(number, request.check_in, request.check_out)
                    .is_empty()
                {
                    return Err(BookingError::RoomUnavailable);
                }
                let room = &tables.rooms[number.as_str()];
                (room.nightly_rate, room.discount_percent)
            }
            BookingTarget::Accommodation(id) => {
                let accommodation =
                    tables
                        .accommodations
                        .get(id)
                        .ok_or(BookingError::NotFound {
                            resource: "accommodation",
                        })?;
                check_capacity(
                    accommodation.max_adults,
                    request.room_count,
                    request.guest_count,
                )?;
                (accommodation.base_price, 0)
            }
        };

        let coupon = match &request.coupon_code {
            Some(code) => {
                let coupon = tables
                    .coupons
                    .get(code)
                    .ok_or(BookingError::CouponRejected(CouponRejection::NotFound))?;
                coupon
                    .validate(self.clock.now())
                    .map_err(BookingError::CouponRejected)?;
                Some(coupon.clone())
            }
            None => None,
        };

        let discount = Discount::select(coupon.as_ref().map(|c| c.percent), base_discount);
        let priced = quote(
            nightly_rate,
            request.check_in,
            request.check_out,
            request.room_count,
            discount,
        )?;

        let booking = Booking {
            id: BookingId::new(),
            target: request.target.clone(),
            party: request.party,
            check_in: request.check_in,
            check_out: request.check_out,
            guest_count: request.guest_count,
            room_count: request.room_count,
            room_price: nightly_rate,
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

        // All rejections are behind us; the writes below cannot fail, which
        // is what makes this commit all-or-nothing.
        if let Some(coupon) = &coupon {
            if let Some(stored) = tables.coupons.get_mut(&coupon.code) {
                stored.quantity -= 1;
            }
        }
        if let BookingTarget::Room(number) = &request.target {
            if let Some(room) = tables.rooms.get_mut(number.as_str()) {
                room.room_status = RoomStatus::Occupied;
                room.current_booking = Some(booking.id);
            }
        }
        tables.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn update_booking(&self, id: BookingId, patch: BookingPatch) -> Result<Booking> {
        let mut tables = self.store.lock()?;
        let booking = tables
            .bookings
            .get_mut(&id)
            .ok_or(BookingError::NotFound {
                resource: "booking",
            })?;
        if let Some(to) = patch.payment_status {
            booking.payment_status = booking.payment_status.transition(to)?;
        }
        if let Some(employee) = patch.employee {
            booking.employee = Some(employee);
        }
        Ok(booking.clone())
    }

    async fn cancel_booking(&self, id: BookingId) -> Result<()> {
        let mut tables = self.store.lock()?;
        let booking = tables
            .bookings
            .remove(&id)
            .ok_or(BookingError::NotFound {
                resource: "booking",
            })?;
        if let BookingTarget::Room(number) = &booking.target {
            if let Some(room) = tables.rooms.get_mut(number.as_str()) {
                if room.current_booking == Some(id) {
                    room.room_status = RoomStatus::Available;
                    room.current_booking = None;
                    room.housekeeping_status = HousekeepingStatus::WaitingForClean;
                }
            }
        }
        // The redeemed coupon keeps its decrement.
        Ok(())
    }
}
