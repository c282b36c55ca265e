//! Coupon API endpoints.
//!
//! - POST /api/coupons - Create a coupon (staff)
//! - GET /api/coupons/:code - Validation preview
//! - DELETE /api/coupons/:code - Retire a coupon early
//!
//! The preview runs the same validation the ledger runs at commit, so its
//! answer matches what a booking with this code would see right now. It is
//! advisory only: the coupon can still race away before commit.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use roomledger_core::coupon::CouponRejection;
use roomledger_core::error::BookingError;
use roomledger_core::store::{Clock, CouponStore};
use roomledger_core::types::{Coupon, CouponId};
use serde::{Deserialize, Serialize};

/// Request to create a coupon.
#[derive(Debug, Deserialize)]
pub struct CreateCouponRequest {
    /// Unique coupon code
    pub code: String,
    /// Discount in percent, `(0, 100]`
    pub percent: u8,
    /// Number of redemptions
    pub quantity: u32,
    /// Last instant at which the coupon is usable
    pub expires_at: DateTime<Utc>,
}

/// Coupon details response.
#[derive(Debug, Serialize)]
pub struct CouponResponse {
    /// Coupon code
    pub code: String,
    /// Discount in percent
    pub percent: u8,
    /// Remaining redemptions
    pub quantity: u32,
    /// Expiry instant
    pub expires_at: DateTime<Utc>,
    /// Whether the coupon is active
    pub is_active: bool,
}

impl From<Coupon> for CouponResponse {
    fn from(coupon: Coupon) -> Self {
        Self {
            code: coupon.code,
            percent: coupon.percent,
            quantity: coupon.quantity,
            expires_at: coupon.expires_at,
            is_active: coupon.is_active,
        }
    }
}

/// Validation preview response.
#[derive(Debug, Serialize)]
pub struct CouponPreviewResponse {
    /// Whether a booking with this code would currently be accepted
    pub valid: bool,
    /// Discount in percent, when valid
    pub percent: Option<u8>,
    /// Remaining redemptions, when valid
    pub remaining: Option<u32>,
    /// Rejection reason, when invalid
    pub reason: Option<String>,
}

/// Create a coupon.
pub async fn create_coupon(
    State(state): State<AppState>,
    Json(request): Json<CreateCouponRequest>,
) -> Result<(StatusCode, Json<CouponResponse>), AppError> {
    if request.percent == 0 || request.percent > 100 {
        return Err(AppError::validation("percent must be in (0, 100]"));
    }
    let coupon = Coupon {
        id: CouponId::new(),
        code: request.code,
        percent: request.percent,
        quantity: request.quantity,
        expires_at: request.expires_at,
        is_active: true,
    };
    state.coupons.create(&coupon).await?;
    Ok((StatusCode::CREATED, Json(coupon.into())))
}

/// Preview whether a coupon would be accepted right now.
pub async fn preview_coupon(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CouponPreviewResponse>, AppError> {
    let coupon = match state.coupons.find_by_code(&code).await {
        Ok(coupon) => coupon,
        Err(BookingError::NotFound { .. }) => {
            return Ok(Json(CouponPreviewResponse {
                valid: false,
                percent: None,
                remaining: None,
                reason: Some(CouponRejection::NotFound.to_string()),
            }));
        }
        Err(err) => return Err(err.into()),
    };
    let preview = match coupon.validate(state.clock.now()) {
        Ok(valid) => CouponPreviewResponse {
            valid: true,
            percent: Some(valid.percent),
            remaining: Some(valid.remaining),
            reason: None,
        },
        Err(rejection) => CouponPreviewResponse {
            valid: false,
            percent: None,
            remaining: None,
            reason: Some(rejection.to_string()),
        },
    };
    Ok(Json(preview))
}

/// Retire a coupon early by clearing its active flag.
pub async fn deactivate_coupon(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    state.coupons.deactivate(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}
