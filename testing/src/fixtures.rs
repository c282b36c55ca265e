//! Fixture builders with sensible defaults.
//!
//! Every builder returns a fully valid entity; tests override the fields
//! they care about.

use chrono::{Duration, NaiveDate, Utc};
use roomledger_core::ledger::BookingRequest;
use roomledger_core::party::GuestForm;
use roomledger_core::status::{BookingKind, HousekeepingStatus, RoomStatus};
use roomledger_core::types::{
    Accommodation, AccommodationId, BookingTarget, Coupon, CouponId, GuestProfile, Money, Party,
    Room, RoomId, RoomNumber, User, UserId,
};

/// A clean, available double room at 3000 a night.
#[must_use]
pub fn room(number: &str) -> Room {
    Room {
        id: RoomId::new(),
        room_number: RoomNumber::new(number),
        floor: 1,
        capacity: 2,
        room_type: "double".to_string(),
        nightly_rate: Money::from_units(3000),
        discount_percent: 0,
        room_status: RoomStatus::Available,
        housekeeping_status: HousekeepingStatus::Clean,
        current_booking: None,
    }
}

/// A two-adult listing at 5000 a night.
#[must_use]
pub fn accommodation(title: &str) -> Accommodation {
    Accommodation {
        id: AccommodationId::new(),
        title: title.to_string(),
        description: "A comfortable stay".to_string(),
        base_price: Money::from_units(5000),
        max_adults: 2,
        specs: vec!["wifi".to_string(), "breakfast".to_string()],
        images: Vec::new(),
        created_at: Utc::now(),
    }
}

/// An active coupon expiring in thirty days.
#[must_use]
pub fn coupon(code: &str, percent: u8, quantity: u32) -> Coupon {
    Coupon {
        id: CouponId::new(),
        code: code.to_string(),
        percent,
        quantity,
        expires_at: Utc::now() + Duration::days(30),
        is_active: true,
    }
}

/// A complete inline guest profile.
#[must_use]
pub fn guest_profile() -> GuestProfile {
    GuestProfile {
        name: "Rahim Uddin".to_string(),
        age: 34,
        father_name: "Karim Uddin".to_string(),
        address: "12 Lake Road, Dhaka".to_string(),
        mobile: "01700000000".to_string(),
        nationality: "Bangladeshi".to_string(),
        profession: "Engineer".to_string(),
        passport_or_nid: "NID-1234567890".to_string(),
        guest_type: "tourist".to_string(),
        vehicle_number: None,
    }
}

/// The same profile as [`guest_profile`], in form shape.
#[must_use]
pub fn guest_form() -> GuestForm {
    let profile = guest_profile();
    GuestForm {
        name: Some(profile.name),
        age: Some(profile.age),
        father_name: Some(profile.father_name),
        address: Some(profile.address),
        mobile: Some(profile.mobile),
        nationality: Some(profile.nationality),
        profession: Some(profile.profession),
        passport_or_nid: Some(profile.passport_or_nid),
        guest_type: Some(profile.guest_type),
        vehicle_number: None,
    }
}

/// A registered user.
#[must_use]
pub fn user(phone: &str) -> User {
    User {
        id: UserId::new(),
        name: "Salma Akter".to_string(),
        phone: phone.to_string(),
        email: Some("salma@example.com".to_string()),
        address: "45 Green Road, Dhaka".to_string(),
        nid: Some("NID-9876543210".to_string()),
        passport: None,
        nationality: "Bangladeshi".to_string(),
        profession: "Teacher".to_string(),
        age: 29,
        marital_status: "married".to_string(),
        vehicle_number: None,
        father_name: "Abdul Akter".to_string(),
        role: "guest".to_string(),
    }
}

/// A two-night guest booking request for the given room.
#[must_use]
pub fn booking_request(room_number: &str, check_in: NaiveDate) -> BookingRequest {
    BookingRequest {
        target: BookingTarget::Room(RoomNumber::new(room_number)),
        party: Party::Guest(guest_profile()),
        check_in,
        check_out: check_in + Duration::days(2),
        guest_count: 2,
        room_count: 1,
        coupon_code: None,
        booking_kind: BookingKind::Online,
        employee: None,
    }
}
