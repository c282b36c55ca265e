//! Room inventory API endpoints.
//!
//! - GET /api/rooms - Availability search for a date range
//! - POST /api/rooms - Create a room (staff)
//! - GET /api/rooms/:number - Get room details
//! - PUT /api/rooms/:number/status - Move occupancy status
//! - PUT /api/rooms/:number/housekeeping - Move housekeeping status

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use roomledger_core::status::{HousekeepingStatus, RoomStatus};
use roomledger_core::store::{AvailabilityFilter, InventoryStore};
use roomledger_core::types::{BookingId, Money, Room, RoomId, RoomNumber};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for availability search.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// First night of the requested stay
    pub check_in: NaiveDate,
    /// Departure date of the requested stay
    pub check_out: NaiveDate,
    /// Restrict to a floor
    pub floor: Option<i16>,
    /// Restrict to a room type
    pub room_type: Option<String>,
    /// Require at least this capacity per room
    pub min_capacity: Option<u32>,
}

/// Request to create a room.
#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    /// Unique room number
    pub room_number: String,
    /// Floor the room is on
    pub floor: i16,
    /// Maximum number of guests
    pub capacity: u32,
    /// Room category
    pub room_type: String,
    /// Price per night, in whole currency units
    pub nightly_rate: i64,
    /// Base discount in percent (default: 0)
    #[serde(default)]
    pub discount_percent: u8,
}

/// Room details response.
#[derive(Debug, Serialize)]
pub struct RoomResponse {
    /// Room number
    pub room_number: String,
    /// Floor
    pub floor: i16,
    /// Capacity per room
    pub capacity: u32,
    /// Room category
    pub room_type: String,
    /// Price per night
    pub nightly_rate: Money,
    /// Base discount in percent
    pub discount_percent: u8,
    /// Occupancy state
    pub room_status: RoomStatus,
    /// Housekeeping state
    pub housekeeping_status: HousekeepingStatus,
    /// The booking currently holding this room
    pub current_booking: Option<BookingId>,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            room_number: room.room_number.to_string(),
            floor: room.floor,
            capacity: room.capacity,
            room_type: room.room_type,
            nightly_rate: room.nightly_rate,
            discount_percent: room.discount_percent,
            room_status: room.room_status,
            housekeeping_status: room.housekeeping_status,
            current_booking: room.current_booking,
        }
    }
}

/// Request to change a room's occupancy status.
#[derive(Debug, Deserialize)]
pub struct SetRoomStatusRequest {
    /// Target status
    pub status: RoomStatus,
}

/// Request to change a room's housekeeping status.
#[derive(Debug, Deserialize)]
pub struct SetHousekeepingRequest {
    /// Target status
    pub status: HousekeepingStatus,
}

// ============================================================================
// Handlers
// ============================================================================

/// List rooms free for a date range.
///
/// Excludes maintenance rooms and rooms with an overlapping active booking;
/// back-to-back stays sharing a turnover day do not conflict.
pub async fn list_available(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<RoomResponse>>, AppError> {
    if query.check_out <= query.check_in {
        return Err(AppError::validation("check-out must be after check-in"));
    }
    let rooms = state
        .inventory
        .list_available(&AvailabilityFilter {
            check_in: query.check_in,
            check_out: query.check_out,
            floor: query.floor,
            room_type: query.room_type,
            min_capacity: query.min_capacity,
        })
        .await?;
    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}

/// Create a room.
pub async fn create_room(
    State(state): State<AppState>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>), AppError> {
    let room = Room {
        id: RoomId::new(),
        room_number: RoomNumber::new(request.room_number),
        floor: request.floor,
        capacity: request.capacity,
        room_type: request.room_type,
        nightly_rate: Money::from_units(request.nightly_rate),
        discount_percent: request.discount_percent,
        room_status: RoomStatus::Available,
        housekeeping_status: HousekeepingStatus::Clean,
        current_booking: None,
    };
    state.inventory.create_room(&room).await?;
    Ok((StatusCode::CREATED, Json(room.into())))
}

/// Get room details.
pub async fn get_room(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<RoomResponse>, AppError> {
    let room = state.inventory.find_room(&RoomNumber::new(number)).await?;
    Ok(Json(room.into()))
}

/// Move a room's occupancy status through the transition table.
pub async fn set_room_status(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Json(request): Json<SetRoomStatusRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let room = state
        .inventory
        .set_room_status(&RoomNumber::new(number), request.status)
        .await?;
    Ok(Json(room.into()))
}

/// Move a room's housekeeping status through the transition table.
pub async fn set_housekeeping_status(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Json(request): Json<SetHousekeepingRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let room = state
        .inventory
        .set_housekeeping_status(&RoomNumber::new(number), request.status)
        .await?;
    Ok(Json(room.into()))
}
