//! Accommodation listing API endpoints.
//!
//! - GET /api/accommodations - List all listings
//! - POST /api/accommodations - Create a listing (staff)
//! - GET /api/accommodations/:id - Get listing details
//! - PUT /api/accommodations/:id - Replace a listing

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use roomledger_core::store::{Clock, InventoryStore};
use roomledger_core::types::{Accommodation, AccommodationId, Money};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create or replace a listing.
#[derive(Debug, Deserialize)]
pub struct AccommodationRequest {
    /// Listing title
    pub title: String,
    /// Listing description
    pub description: String,
    /// Price per night, in whole currency units
    pub base_price: i64,
    /// Maximum number of adults
    pub max_adults: u32,
    /// Feature list
    #[serde(default)]
    pub specs: Vec<String>,
    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,
}

/// Listing details response.
#[derive(Debug, Serialize)]
pub struct AccommodationResponse {
    /// Listing identifier
    pub id: AccommodationId,
    /// Listing title
    pub title: String,
    /// Listing description
    pub description: String,
    /// Price per night
    pub base_price: Money,
    /// Maximum number of adults
    pub max_adults: u32,
    /// Feature list
    pub specs: Vec<String>,
    /// Image URLs
    pub images: Vec<String>,
    /// When the listing was created
    pub created_at: DateTime<Utc>,
}

impl From<Accommodation> for AccommodationResponse {
    fn from(listing: Accommodation) -> Self {
        Self {
            id: listing.id,
            title: listing.title,
            description: listing.description,
            base_price: listing.base_price,
            max_adults: listing.max_adults,
            specs: listing.specs,
            images: listing.images,
            created_at: listing.created_at,
        }
    }
}

/// List all accommodation listings.
pub async fn list_accommodations(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccommodationResponse>>, AppError> {
    let listings = state.inventory.list_accommodations().await?;
    Ok(Json(
        listings.into_iter().map(AccommodationResponse::from).collect(),
    ))
}

/// Create an accommodation listing.
pub async fn create_accommodation(
    State(state): State<AppState>,
    Json(request): Json<AccommodationRequest>,
) -> Result<(StatusCode, Json<AccommodationResponse>), AppError> {
    let listing = Accommodation {
        id: AccommodationId::new(),
        title: request.title,
        description: request.description,
        base_price: Money::from_units(request.base_price),
        max_adults: request.max_adults,
        specs: request.specs,
        images: request.images,
        created_at: state.clock.now(),
    };
    state.inventory.create_accommodation(&listing).await?;
    Ok((StatusCode::CREATED, Json(listing.into())))
}

/// Get listing details.
pub async fn get_accommodation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccommodationResponse>, AppError> {
    let listing = state
        .inventory
        .find_accommodation(AccommodationId::from_uuid(id))
        .await?;
    Ok(Json(listing.into()))
}

/// Replace a listing.
///
/// Listings are immutable except through this explicit full replacement;
/// `created_at` is preserved.
pub async fn update_accommodation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AccommodationRequest>,
) -> Result<Json<AccommodationResponse>, AppError> {
    let id = AccommodationId::from_uuid(id);
    let existing = state.inventory.find_accommodation(id).await?;
    let listing = Accommodation {
        id,
        title: request.title,
        description: request.description,
        base_price: Money::from_units(request.base_price),
        max_adults: request.max_adults,
        specs: request.specs,
        images: request.images,
        created_at: existing.created_at,
    };
    state.inventory.update_accommodation(&listing).await?;
    Ok(Json(listing.into()))
}
