//! HTTP API tests.
//!
//! Drives the full router over the in-memory store wiring, asserting status
//! codes and the machine-readable `code` strings clients branch on.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use axum_test::TestServer;
use chrono::{Duration, NaiveDate, Utc};
use roomledger_core::store::Clock;
use roomledger_testing::{
    FixedClock, MemoryLedger, MemoryStore, RecordingDispatcher, StaticTokenVerifier, fixtures,
};
use roomledger_web::{AppState, build_router};
use serde_json::{Value, json};
use std::sync::Arc;

struct Harness {
    server: TestServer,
    store: MemoryStore,
    clock: Arc<FixedClock>,
    verifier: StaticTokenVerifier,
    dispatcher: RecordingDispatcher,
}

fn harness() -> Harness {
    let store = MemoryStore::new();
    let clock = Arc::new(FixedClock::now_pinned());
    let verifier = StaticTokenVerifier::new();
    let dispatcher = RecordingDispatcher::new();
    let state = AppState {
        inventory: Arc::new(store.clone()),
        coupons: Arc::new(store.clone()),
        users: Arc::new(store.clone()),
        bookings: Arc::new(store.clone()),
        ledger: Arc::new(MemoryLedger::new(store.clone(), Arc::clone(&clock))),
        verifier: Arc::new(verifier.clone()),
        dispatcher: Arc::new(dispatcher.clone()),
        clock: clock.clone() as Arc<dyn Clock>,
    };
    let server = TestServer::new(build_router(state)).expect("router should start");
    Harness {
        server,
        store,
        clock,
        verifier,
        dispatcher,
    }
}

fn tomorrow(clock: &FixedClock) -> NaiveDate {
    clock.today() + Duration::days(1)
}

fn guest_booking_body(room: &str, check_in: NaiveDate, nights: i64) -> Value {
    json!({
        "room_number": room,
        "check_in": check_in,
        "check_out": check_in + Duration::days(nights),
        "guest_count": 2,
        "guest": {
            "name": "Rahim Uddin",
            "age": 34,
            "father_name": "Karim Uddin",
            "address": "12 Lake Road, Dhaka",
            "mobile": "01700000000",
            "nationality": "Bangladeshi",
            "profession": "Engineer",
            "passport_or_nid": "NID-1234567890",
            "guest_type": "tourist"
        }
    })
}

#[tokio::test]
async fn health_and_ready_respond() {
    let h = harness();
    h.server.get("/health").await.assert_status_ok();
    h.server.get("/ready").await.assert_status_ok();
}

#[tokio::test]
async fn guest_booking_round_trips_with_correct_total() {
    let h = harness();
    h.store.seed_room(fixtures::room("101"));

    let created = h
        .server
        .post("/api/bookings")
        .json(&guest_booking_body("101", tomorrow(&h.clock), 3))
        .await;
    created.assert_status(http::StatusCode::CREATED);
    let body: Value = created.json();
    assert_eq!(body["total_price"], json!(9000));
    assert_eq!(body["payment_status"], json!("pending"));

    let id = body["id"].as_str().unwrap();
    let fetched = h.server.get(&format!("/api/bookings/{id}")).await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>()["total_price"], json!(9000));
}

#[tokio::test]
async fn booking_without_credential_or_guest_form_is_rejected() {
    let h = harness();
    h.store.seed_room(fixtures::room("101"));

    let check_in = tomorrow(&h.clock);
    let response = h
        .server
        .post("/api/bookings")
        .json(&json!({
            "room_number": "101",
            "check_in": check_in,
            "check_out": check_in + Duration::days(2),
            "guest_count": 2
        }))
        .await;
    response.assert_status(http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>()["code"],
        json!("INCOMPLETE_GUEST_PROFILE")
    );
}

#[tokio::test]
async fn bearer_credential_attributes_the_booking_to_the_user() {
    let h = harness();
    h.store.seed_room(fixtures::room("101"));
    let user = fixtures::user("01811111111");
    let user_id = user.id;
    h.store.seed_user(user);
    h.verifier
        .insert("session-token", user_id, Utc::now() + Duration::hours(1));

    let check_in = tomorrow(&h.clock);
    let response = h
        .server
        .post("/api/bookings")
        .authorization_bearer("session-token")
        .json(&json!({
            "room_number": "101",
            "check_in": check_in,
            "check_out": check_in + Duration::days(2),
            "guest_count": 2
        }))
        .await;
    response.assert_status(http::StatusCode::CREATED);
}

#[tokio::test]
async fn stale_bearer_credential_falls_back_to_the_guest_form() {
    let h = harness();
    h.store.seed_room(fixtures::room("101"));

    let response = h
        .server
        .post("/api/bookings")
        .authorization_bearer("bogus")
        .json(&guest_booking_body("101", tomorrow(&h.clock), 2))
        .await;
    response.assert_status(http::StatusCode::CREATED);
}

#[tokio::test]
async fn stale_bearer_without_a_guest_form_is_incomplete() {
    let h = harness();
    h.store.seed_room(fixtures::room("101"));

    let check_in = tomorrow(&h.clock);
    let response = h
        .server
        .post("/api/bookings")
        .authorization_bearer("bogus")
        .json(&json!({
            "room_number": "101",
            "check_in": check_in,
            "check_out": check_in + Duration::days(2),
            "guest_count": 2
        }))
        .await;
    response.assert_status(http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>()["code"],
        json!("INCOMPLETE_GUEST_PROFILE")
    );
}

#[tokio::test]
async fn double_booking_conflicts_with_409() {
    let h = harness();
    h.store.seed_room(fixtures::room("101"));
    let check_in = tomorrow(&h.clock);

    h.server
        .post("/api/bookings")
        .json(&guest_booking_body("101", check_in, 2))
        .await
        .assert_status(http::StatusCode::CREATED);

    let second = h
        .server
        .post("/api/bookings")
        .json(&guest_booking_body("101", check_in, 2))
        .await;
    second.assert_status(http::StatusCode::CONFLICT);
    assert_eq!(second.json::<Value>()["code"], json!("ROOM_UNAVAILABLE"));
}

#[tokio::test]
async fn expired_coupon_carries_its_own_code() {
    let h = harness();
    h.store.seed_room(fixtures::room("101"));
    let mut coupon = fixtures::coupon("OLD", 10, 5);
    coupon.expires_at = Utc::now() - Duration::hours(1);
    h.store.seed_coupon(coupon);

    let mut body = guest_booking_body("101", tomorrow(&h.clock), 2);
    body["coupon_code"] = json!("OLD");
    let response = h.server.post("/api/bookings").json(&body).await;
    response.assert_status(http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["code"], json!("COUPON_EXPIRED"));
}

#[tokio::test]
async fn availability_search_excludes_the_booked_room() {
    let h = harness();
    h.store.seed_room(fixtures::room("101"));
    h.store.seed_room(fixtures::room("102"));
    let check_in = tomorrow(&h.clock);

    h.server
        .post("/api/bookings")
        .json(&guest_booking_body("101", check_in, 2))
        .await
        .assert_status(http::StatusCode::CREATED);

    let response = h
        .server
        .get("/api/rooms")
        .add_query_param("check_in", check_in.to_string())
        .add_query_param("check_out", (check_in + Duration::days(2)).to_string())
        .await;
    response.assert_status_ok();
    let rooms: Value = response.json();
    let numbers: Vec<&str> = rooms
        .as_array()
        .unwrap()
        .iter()
        .map(|room| room["room_number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["102"]);
}

#[tokio::test]
async fn coupon_preview_reports_validity() {
    let h = harness();
    h.store.seed_coupon(fixtures::coupon("TEN", 10, 5));

    let valid = h.server.get("/api/coupons/TEN").await;
    valid.assert_status_ok();
    let body: Value = valid.json();
    assert_eq!(body["valid"], json!(true));
    assert_eq!(body["percent"], json!(10));

    let missing = h.server.get("/api/coupons/NOPE").await;
    missing.assert_status_ok();
    assert_eq!(missing.json::<Value>()["valid"], json!(false));
}

#[tokio::test]
async fn duplicate_phone_registration_is_rejected() {
    let h = harness();
    let body = json!({
        "name": "Salma Akter",
        "phone": "01811111111",
        "address": "45 Green Road, Dhaka",
        "nationality": "Bangladeshi",
        "profession": "Teacher",
        "age": 29,
        "marital_status": "married",
        "father_name": "Abdul Akter"
    });

    h.server
        .post("/api/users")
        .json(&body)
        .await
        .assert_status(http::StatusCode::CREATED);

    let duplicate = h.server.post("/api/users").json(&body).await;
    duplicate.assert_status(http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        duplicate.json::<Value>()["code"],
        json!("PHONE_ALREADY_REGISTERED")
    );
}

#[tokio::test]
async fn illegal_room_status_transition_is_rejected() {
    let h = harness();
    h.store.seed_room(fixtures::room("101"));

    // An occupied room cannot be soft-held by the front desk.
    h.server
        .put("/api/rooms/101/status")
        .json(&json!({"status": "occupied"}))
        .await
        .assert_status_ok();

    let response = h
        .server
        .put("/api/rooms/101/status")
        .json(&json!({"status": "reserved"}))
        .await;
    response.assert_status(http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["code"], json!("ILLEGAL_TRANSITION"));
}

#[tokio::test]
async fn unknown_booking_is_404() {
    let h = harness();
    let response = h
        .server
        .get(&format!("/api/bookings/{}", uuid::Uuid::new_v4()))
        .await;
    response.assert_status(http::StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn cancellation_releases_the_room() {
    let h = harness();
    h.store.seed_room(fixtures::room("101"));

    let created = h
        .server
        .post("/api/bookings")
        .json(&guest_booking_body("101", tomorrow(&h.clock), 2))
        .await;
    let id = created.json::<Value>()["id"].as_str().unwrap().to_string();

    h.server
        .delete(&format!("/api/bookings/{id}"))
        .await
        .assert_status(http::StatusCode::NO_CONTENT);

    let room = h.server.get("/api/rooms/101").await;
    assert_eq!(room.json::<Value>()["room_status"], json!("available"));
}

#[tokio::test]
async fn notification_failure_never_affects_the_booking() {
    let h = harness();
    h.store.seed_room(fixtures::room("101"));
    h.dispatcher.fail_next_sends();

    let response = h
        .server
        .post("/api/bookings")
        .json(&guest_booking_body("101", tomorrow(&h.clock), 2))
        .await;
    response.assert_status(http::StatusCode::CREATED);
    assert!(h.dispatcher.sent().is_empty());
}

#[tokio::test]
async fn accommodation_crud_round_trips() {
    let h = harness();

    let created = h
        .server
        .post("/api/accommodations")
        .json(&json!({
            "title": "Deluxe Double",
            "description": "Lake view",
            "base_price": 5000,
            "max_adults": 2,
            "specs": ["wifi"]
        }))
        .await;
    created.assert_status(http::StatusCode::CREATED);
    let id = created.json::<Value>()["id"].as_str().unwrap().to_string();

    let updated = h
        .server
        .put(&format!("/api/accommodations/{id}"))
        .json(&json!({
            "title": "Deluxe Double",
            "description": "Lake view, renovated",
            "base_price": 5500,
            "max_adults": 3
        }))
        .await;
    updated.assert_status_ok();
    assert_eq!(updated.json::<Value>()["base_price"], json!(5500));

    let listed = h.server.get("/api/accommodations").await;
    listed.assert_status_ok();
    assert_eq!(listed.json::<Value>().as_array().unwrap().len(), 1);
}
