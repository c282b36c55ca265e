//! Booking API endpoints.
//!
//! - POST /api/bookings - Create a booking
//! - GET /api/bookings/:id - Get booking details
//! - PATCH /api/bookings/:id - Update payment status / assisting employee
//! - DELETE /api/bookings/:id - Cancel a booking

use crate::error::AppError;
use crate::handlers::bearer_token;
use crate::notify;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use chrono::{DateTime, NaiveDate, Utc};
use roomledger_core::ledger::{BookingLedger, BookingPatch, BookingRequest};
use roomledger_core::party::{GuestForm, resolve_booking_party};
use roomledger_core::status::{BookingKind, PaymentStatus};
use roomledger_core::store::{BookingStore, TokenVerifier, UserStore};
use roomledger_core::types::{
    AccommodationId, Booking, BookingId, BookingTarget, EmployeeId, Money, Party, RoomNumber,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a booking.
///
/// Exactly one of `room_number` and `accommodation_id` must be set. The
/// party comes from a bearer credential when one is presented, otherwise
/// from the inline `guest` form.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    /// Room number to book (discrete inventory)
    pub room_number: Option<String>,
    /// Accommodation listing to book
    pub accommodation_id: Option<Uuid>,
    /// First night of the stay
    pub check_in: NaiveDate,
    /// Departure date (exclusive)
    pub check_out: NaiveDate,
    /// Number of guests
    pub guest_count: u32,
    /// Number of rooms (default: 1)
    #[serde(default = "default_room_count")]
    pub room_count: u32,
    /// Coupon code to redeem
    pub coupon_code: Option<String>,
    /// Online or front-desk booking (default: online)
    pub booking_kind: Option<BookingKind>,
    /// Assisting staff member, for front-desk bookings
    pub employee_id: Option<Uuid>,
    /// Inline guest details, for unauthenticated bookings
    pub guest: Option<GuestForm>,
}

const fn default_room_count() -> u32 {
    1
}

/// Booking details response.
///
/// The party is deliberately omitted: guest profiles carry identity
/// documents that do not belong in a read response.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    /// Booking identifier
    pub id: BookingId,
    /// What was booked
    pub target: BookingTarget,
    /// First night of the stay
    pub check_in: NaiveDate,
    /// Departure date
    pub check_out: NaiveDate,
    /// Number of guests
    pub guest_count: u32,
    /// Number of rooms
    pub room_count: u32,
    /// Nightly rate snapshot
    pub room_price: Money,
    /// Coupon percent applied, if any
    pub coupon_percent: Option<u8>,
    /// Total for the whole stay
    pub total_price: Money,
    /// Payment lifecycle state
    pub payment_status: PaymentStatus,
    /// How the booking was made
    pub booking_kind: BookingKind,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            target: booking.target,
            check_in: booking.check_in,
            check_out: booking.check_out,
            guest_count: booking.guest_count,
            room_count: booking.room_count,
            room_price: booking.room_price,
            coupon_percent: booking.coupon_percent,
            total_price: booking.total_price,
            payment_status: booking.payment_status,
            booking_kind: booking.booking_kind,
            created_at: booking.created_at,
        }
    }
}

/// Request to update a booking.
///
/// Only the payment status and the assisting employee are patchable;
/// everything else is immutable after creation.
#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    /// New payment status
    pub payment_status: Option<PaymentStatus>,
    /// New assisting employee
    pub employee_id: Option<Uuid>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a booking.
///
/// With a verified `Authorization: Bearer` credential the booking is
/// attributed to the user. A rejected credential does not block a walk-in:
/// a complete guest form still identifies the party, and only when neither
/// is usable is the request incomplete. The commit is all-or-nothing:
/// coupon redemption, room assignment, and the booking row land together
/// or not at all.
pub async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let verified = match bearer_token(&headers) {
        Some(token) => match state.verifier.verify(token).await {
            Ok(user_id) => Some(user_id),
            Err(rejection) => {
                warn!(%rejection, "bearer credential rejected, falling back to guest form");
                None
            }
        },
        None => None,
    };
    let party = resolve_booking_party(verified, request.guest)?;

    let target = match (request.room_number, request.accommodation_id) {
        (Some(number), None) => BookingTarget::Room(RoomNumber::new(number)),
        (None, Some(id)) => BookingTarget::Accommodation(AccommodationId::from_uuid(id)),
        _ => {
            return Err(AppError::validation(
                "exactly one of room_number and accommodation_id is required",
            ));
        }
    };

    let booking = state
        .ledger
        .create_booking(BookingRequest {
            target,
            party,
            check_in: request.check_in,
            check_out: request.check_out,
            guest_count: request.guest_count,
            room_count: request.room_count,
            coupon_code: request.coupon_code,
            booking_kind: request.booking_kind.unwrap_or(BookingKind::Online),
            employee: request.employee_id.map(EmployeeId::from_uuid),
        })
        .await?;

    // Fire-and-forget confirmation; delivery never affects the outcome.
    let dispatcher = Arc::clone(&state.dispatcher);
    let users = Arc::clone(&state.users);
    let confirmed = booking.clone();
    tokio::spawn(async move {
        if let Some(recipient) = confirmation_recipient(users.as_ref(), &confirmed).await {
            notify::send_confirmation(dispatcher.as_ref(), &recipient, &confirmed).await;
        }
    });

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// Where to deliver the confirmation for this booking.
async fn confirmation_recipient(users: &dyn UserStore, booking: &Booking) -> Option<String> {
    match &booking.party {
        Party::Guest(_) => notify::guest_recipient(booking),
        Party::User(id) => match users.find_by_id(*id).await {
            Ok(user) => Some(user.email.unwrap_or(user.phone)),
            Err(err) => {
                warn!(booking_id = %booking.id, error = %err, "could not resolve recipient");
                None
            }
        },
    }
}

/// Get booking details.
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.bookings.find(BookingId::from_uuid(id)).await?;
    Ok(Json(booking.into()))
}

/// Apply an allow-listed patch to a booking.
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .ledger
        .update_booking(
            BookingId::from_uuid(id),
            BookingPatch {
                payment_status: request.payment_status,
                employee: request.employee_id.map(EmployeeId::from_uuid),
            },
        )
        .await?;
    Ok(Json(booking.into()))
}

/// Cancel a booking, releasing its room.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.ledger.cancel_booking(BookingId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
