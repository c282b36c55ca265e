//! Booking ledger behavior tests.
//!
//! Exercises the shared precondition pipeline and commit semantics through
//! the in-memory ledger: pricing, coupon redemption, room assignment,
//! cancellation, and the at-most-one-winner guarantee under concurrency.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use chrono::{Duration, NaiveDate};
use roomledger_core::coupon::CouponRejection;
use roomledger_core::error::BookingError;
use roomledger_core::ledger::{BookingLedger, BookingPatch};
use roomledger_core::status::{HousekeepingStatus, PaymentStatus, RoomStatus};
use roomledger_core::store::{BookingStore, Clock, InventoryStore};
use roomledger_core::types::{BookingTarget, Money, Party, RoomNumber};
use roomledger_testing::{FixedClock, MemoryLedger, MemoryStore, fixtures};
use std::sync::Arc;

fn setup() -> (MemoryStore, MemoryLedger, Arc<FixedClock>) {
    let store = MemoryStore::new();
    let clock = Arc::new(FixedClock::now_pinned());
    let ledger = MemoryLedger::new(store.clone(), Arc::clone(&clock));
    (store, ledger, clock)
}

fn tomorrow(clock: &FixedClock) -> NaiveDate {
    clock.today() + Duration::days(1)
}

#[tokio::test]
async fn create_then_fetch_round_trips() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));

    let request = fixtures::booking_request("101", tomorrow(&clock));
    let created = ledger.create_booking(request.clone()).await.unwrap();
    let fetched = store.find(created.id).await.unwrap();

    assert_eq!(fetched.check_in, request.check_in);
    assert_eq!(fetched.check_out, request.check_out);
    assert_eq!(fetched.guest_count, request.guest_count);
    assert_eq!(fetched.total_price, created.total_price);
    assert_eq!(fetched.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn three_nights_at_3000_totals_9000() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));

    let mut request = fixtures::booking_request("101", tomorrow(&clock));
    request.check_out = request.check_in + Duration::days(3);
    let booking = ledger.create_booking(request).await.unwrap();

    assert_eq!(booking.room_price, Money::from_units(3000));
    assert_eq!(booking.total_price, Money::from_units(9000));
    assert_eq!(booking.coupon_percent, None);
}

#[tokio::test]
async fn ten_percent_coupon_brings_9000_to_8100() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));
    store.seed_coupon(fixtures::coupon("WELCOME10", 10, 5));

    let mut request = fixtures::booking_request("101", tomorrow(&clock));
    request.check_out = request.check_in + Duration::days(3);
    request.coupon_code = Some("WELCOME10".to_string());
    let booking = ledger.create_booking(request).await.unwrap();

    assert_eq!(booking.total_price, Money::from_units(8100));
    assert_eq!(booking.coupon_percent, Some(10));
    assert_eq!(store.coupon_quantity("WELCOME10"), Some(4));
}

#[tokio::test]
async fn coupon_supersedes_room_base_discount() {
    let (store, ledger, clock) = setup();
    let mut room = fixtures::room("101");
    room.discount_percent = 20;
    store.seed_room(room);
    store.seed_coupon(fixtures::coupon("TEN", 10, 5));

    let mut request = fixtures::booking_request("101", tomorrow(&clock));
    request.check_out = request.check_in + Duration::days(3);
    request.coupon_code = Some("TEN".to_string());
    let booking = ledger.create_booking(request).await.unwrap();

    // 9000 minus the coupon's 10%, not minus 30% or 28%.
    assert_eq!(booking.total_price, Money::from_units(8100));
}

#[tokio::test]
async fn base_discount_applies_when_no_coupon() {
    let (store, ledger, clock) = setup();
    let mut room = fixtures::room("101");
    room.discount_percent = 20;
    store.seed_room(room);

    let mut request = fixtures::booking_request("101", tomorrow(&clock));
    request.check_out = request.check_in + Duration::days(3);
    let booking = ledger.create_booking(request).await.unwrap();

    assert_eq!(booking.total_price, Money::from_units(7200));
    // Base discount is not a coupon; the booking records none.
    assert_eq!(booking.coupon_percent, None);
}

#[tokio::test]
async fn exhausted_coupon_rejects_the_booking() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));
    store.seed_coupon(fixtures::coupon("GONE", 10, 0));

    let mut request = fixtures::booking_request("101", tomorrow(&clock));
    request.coupon_code = Some("GONE".to_string());
    let err = ledger.create_booking(request).await.unwrap_err();

    assert_eq!(
        err,
        BookingError::CouponRejected(CouponRejection::Exhausted)
    );
    // Nothing was written: the room is still free.
    let room = store
        .find_room(&RoomNumber::new("101"))
        .await
        .unwrap();
    assert_eq!(room.room_status, RoomStatus::Available);
}

#[tokio::test]
async fn expired_coupon_rejects_identically_every_time() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));
    store.seed_room(fixtures::room("102"));
    let mut coupon = fixtures::coupon("OLD", 10, 5);
    coupon.expires_at = clock.now() - Duration::hours(1);
    store.seed_coupon(coupon);

    for number in ["101", "102"] {
        let mut request = fixtures::booking_request(number, tomorrow(&clock));
        request.coupon_code = Some("OLD".to_string());
        let err = ledger.create_booking(request).await.unwrap_err();
        assert_eq!(err, BookingError::CouponRejected(CouponRejection::Expired));
    }
    assert_eq!(store.coupon_quantity("OLD"), Some(5));
}

#[tokio::test]
async fn unknown_coupon_code_is_rejected() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));

    let mut request = fixtures::booking_request("101", tomorrow(&clock));
    request.coupon_code = Some("NOPE".to_string());
    let err = ledger.create_booking(request).await.unwrap_err();
    assert_eq!(err, BookingError::CouponRejected(CouponRejection::NotFound));
}

#[tokio::test]
async fn maintenance_room_is_rejected_before_pricing() {
    let (store, ledger, clock) = setup();
    let mut room = fixtures::room("101");
    room.room_status = RoomStatus::Maintenance;
    store.seed_room(room);

    let err = ledger
        .create_booking(fixtures::booking_request("101", tomorrow(&clock)))
        .await
        .unwrap_err();
    assert_eq!(err, BookingError::RoomUnavailable);
}

#[tokio::test]
async fn occupied_room_rejects_second_booking() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));

    ledger
        .create_booking(fixtures::booking_request("101", tomorrow(&clock)))
        .await
        .unwrap();
    let err = ledger
        .create_booking(fixtures::booking_request(
            "101",
            tomorrow(&clock) + Duration::days(30),
        ))
        .await
        .unwrap_err();
    assert_eq!(err, BookingError::RoomUnavailable);
}

#[tokio::test]
async fn same_day_checkout_is_an_invalid_range() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));

    let mut request = fixtures::booking_request("101", tomorrow(&clock));
    request.check_out = request.check_in;
    let err = ledger.create_booking(request).await.unwrap_err();
    assert_eq!(err, BookingError::InvalidDateRange);
}

#[tokio::test]
async fn capacity_is_enforced_per_room_count() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));

    let mut request = fixtures::booking_request("101", tomorrow(&clock));
    request.guest_count = 5;
    let err = ledger.create_booking(request).await.unwrap_err();
    assert_eq!(
        err,
        BookingError::CapacityExceeded {
            guests: 5,
            capacity: 2
        }
    );
}

#[tokio::test]
async fn accommodation_bookings_use_base_price_and_skip_room_state() {
    let (store, ledger, clock) = setup();
    let listing = fixtures::accommodation("Deluxe Double");
    let listing_id = listing.id;
    store.seed_accommodation(listing);

    let mut request = fixtures::booking_request("unused", tomorrow(&clock));
    request.target = BookingTarget::Accommodation(listing_id);
    request.check_out = request.check_in + Duration::days(2);
    let booking = ledger.create_booking(request).await.unwrap();

    assert_eq!(booking.total_price, Money::from_units(10000));
}

#[tokio::test]
async fn at_most_one_concurrent_booking_wins_a_room() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let ledger = ledger.clone();
        let request = fixtures::booking_request("101", tomorrow(&clock));
        handles.push(tokio::spawn(async move {
            ledger.create_booking(request).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(err) => assert_eq!(err, BookingError::RoomUnavailable),
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn concurrent_redemptions_never_overdraw_a_coupon() {
    let (store, ledger, clock) = setup();
    for i in 0..10 {
        store.seed_room(fixtures::room(&format!("1{i:02}")));
    }
    store.seed_coupon(fixtures::coupon("SCARCE", 10, 3));

    let mut handles = Vec::new();
    for i in 0..10 {
        let ledger = ledger.clone();
        let mut request = fixtures::booking_request(&format!("1{i:02}"), tomorrow(&clock));
        request.coupon_code = Some("SCARCE".to_string());
        handles.push(tokio::spawn(async move {
            ledger.create_booking(request).await
        }));
    }

    let mut redeemed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => redeemed += 1,
            Err(err) => {
                assert_eq!(err, BookingError::CouponRejected(CouponRejection::Exhausted));
            }
        }
    }
    assert_eq!(redeemed, 3);
    assert_eq!(store.coupon_quantity("SCARCE"), Some(0));
}

#[tokio::test]
async fn cancel_releases_the_room_but_not_the_coupon() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));
    store.seed_coupon(fixtures::coupon("TEN", 10, 5));

    let mut request = fixtures::booking_request("101", tomorrow(&clock));
    request.coupon_code = Some("TEN".to_string());
    let booking = ledger.create_booking(request).await.unwrap();
    assert_eq!(store.coupon_quantity("TEN"), Some(4));

    ledger.cancel_booking(booking.id).await.unwrap();

    let room = store.find_room(&RoomNumber::new("101")).await.unwrap();
    assert_eq!(room.room_status, RoomStatus::Available);
    assert_eq!(room.current_booking, None);
    assert_eq!(room.housekeeping_status, HousekeepingStatus::WaitingForClean);
    // No refund on cancellation.
    assert_eq!(store.coupon_quantity("TEN"), Some(4));
    assert_eq!(
        store.find(booking.id).await.unwrap_err(),
        BookingError::NotFound {
            resource: "booking"
        }
    );
}

#[tokio::test]
async fn payment_status_walks_the_state_machine() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));
    let booking = ledger
        .create_booking(fixtures::booking_request("101", tomorrow(&clock)))
        .await
        .unwrap();

    let partial = ledger
        .update_booking(
            booking.id,
            BookingPatch {
                payment_status: Some(PaymentStatus::Partial),
                employee: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(partial.payment_status, PaymentStatus::Partial);

    let paid = ledger
        .update_booking(
            booking.id,
            BookingPatch {
                payment_status: Some(PaymentStatus::Paid),
                employee: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);

    let err = ledger
        .update_booking(
            booking.id,
            BookingPatch {
                payment_status: Some(PaymentStatus::Pending),
                employee: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::IllegalTransition { .. }));
}

#[tokio::test]
async fn registered_user_party_is_kept_on_the_booking() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));
    let user = fixtures::user("01811111111");
    let user_id = user.id;
    store.seed_user(user);

    let mut request = fixtures::booking_request("101", tomorrow(&clock));
    request.party = Party::User(user_id);
    let booking = ledger.create_booking(request).await.unwrap();

    assert_eq!(booking.party, Party::User(user_id));
}

#[tokio::test]
async fn availability_search_uses_the_overlap_test() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));
    store.seed_room(fixtures::room("102"));

    let check_in = tomorrow(&clock);
    let mut request = fixtures::booking_request("101", check_in);
    request.check_out = check_in + Duration::days(3);
    ledger.create_booking(request).await.unwrap();

    // Overlapping search: only the free room shows.
    let overlapping = store
        .list_available(&roomledger_core::store::AvailabilityFilter {
            check_in: check_in + Duration::days(1),
            check_out: check_in + Duration::days(2),
            floor: None,
            room_type: None,
            min_capacity: None,
        })
        .await
        .unwrap();
    assert_eq!(overlapping.len(), 1);
    assert_eq!(overlapping[0].room_number.as_str(), "102");

    // Back-to-back stay does not overlap; both rooms qualify on dates.
    let adjacent = store
        .list_available(&roomledger_core::store::AvailabilityFilter {
            check_in: check_in + Duration::days(3),
            check_out: check_in + Duration::days(5),
            floor: None,
            room_type: None,
            min_capacity: None,
        })
        .await
        .unwrap();
    assert_eq!(adjacent.len(), 2);
}

#[tokio::test]
async fn past_check_in_is_rejected() {
    let (store, ledger, clock) = setup();
    store.seed_room(fixtures::room("101"));

    let yesterday = clock.today() - Duration::days(1);
    let err = ledger
        .create_booking(fixtures::booking_request("101", yesterday))
        .await
        .unwrap_err();
    assert_eq!(err, BookingError::CheckInInPast);
}
