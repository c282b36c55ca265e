//! User registration API endpoints.
//!
//! - POST /api/users - Register a user (phone-unique)
//! - GET /api/users/:id - Get a user's public profile

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use roomledger_core::store::UserStore;
use roomledger_core::types::{User, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a user.
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    /// Full name
    pub name: String,
    /// Phone number (unique)
    pub phone: String,
    /// Email address
    pub email: Option<String>,
    /// Postal address
    pub address: String,
    /// National ID number
    pub nid: Option<String>,
    /// Passport number
    pub passport: Option<String>,
    /// Nationality
    pub nationality: String,
    /// Profession
    pub profession: String,
    /// Age in years
    pub age: u32,
    /// Marital status
    pub marital_status: String,
    /// Vehicle registration
    pub vehicle_number: Option<String>,
    /// Father's name
    pub father_name: String,
}

/// Public user profile response.
///
/// Identity documents (NID, passport) are not echoed back.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User identifier
    pub id: UserId,
    /// Full name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Email address
    pub email: Option<String>,
    /// Nationality
    pub nationality: String,
    /// Role
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            phone: user.phone,
            email: user.email,
            nationality: user.nationality,
            role: user.role,
        }
    }
}

/// Register a user.
///
/// The phone number is the identity invariant; a duplicate registration is
/// rejected with `PHONE_ALREADY_REGISTERED`.
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = User {
        id: UserId::new(),
        name: request.name,
        phone: request.phone,
        email: request.email,
        address: request.address,
        nid: request.nid,
        passport: request.passport,
        nationality: request.nationality,
        profession: request.profession,
        age: request.age,
        marital_status: request.marital_status,
        vehicle_number: request.vehicle_number,
        father_name: request.father_name,
        role: "guest".to_string(),
    };
    state.users.create(&user).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Get a user's public profile.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.find_by_id(UserId::from_uuid(id)).await?;
    Ok(Json(user.into()))
}
