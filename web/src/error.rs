//! Error types for web handlers.
//!
//! Bridges the domain error taxonomy and HTTP responses: every
//! [`BookingError`] maps onto a status code and a machine-readable `code`
//! string that clients can branch on.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roomledger_core::coupon::CouponRejection;
use roomledger_core::error::BookingError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Wraps domain errors and provides HTTP-friendly error responses via
/// Axum's `IntoResponse`.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 422 Unprocessable Entity error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }
}

/// The `code` string clients branch on for a coupon rejection.
const fn coupon_code(rejection: CouponRejection) -> &'static str {
    match rejection {
        CouponRejection::NotFound => "COUPON_NOT_FOUND",
        CouponRejection::Inactive => "COUPON_INACTIVE",
        CouponRejection::Expired => "COUPON_EXPIRED",
        CouponRejection::Exhausted => "COUPON_EXHAUSTED",
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        let (status, code) = match &err {
            BookingError::InvalidDateRange => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_DATE_RANGE")
            }
            BookingError::CheckInInPast => (StatusCode::UNPROCESSABLE_ENTITY, "CHECK_IN_IN_PAST"),
            BookingError::NoGuests => (StatusCode::UNPROCESSABLE_ENTITY, "NO_GUESTS"),
            BookingError::NoRooms => (StatusCode::UNPROCESSABLE_ENTITY, "NO_ROOMS"),
            BookingError::CapacityExceeded { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "CAPACITY_EXCEEDED")
            }
            BookingError::IncompleteGuestProfile { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INCOMPLETE_GUEST_PROFILE")
            }
            BookingError::IllegalTransition { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "ILLEGAL_TRANSITION")
            }
            BookingError::PhoneAlreadyRegistered => {
                (StatusCode::UNPROCESSABLE_ENTITY, "PHONE_ALREADY_REGISTERED")
            }
            BookingError::CouponRejected(rejection) => {
                (StatusCode::UNPROCESSABLE_ENTITY, coupon_code(*rejection))
            }
            BookingError::RoomUnavailable => (StatusCode::CONFLICT, "ROOM_UNAVAILABLE"),
            BookingError::CouponNoLongerValid { .. } => {
                (StatusCode::CONFLICT, "COUPON_NO_LONGER_VALID")
            }
            BookingError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            BookingError::Store(_) => {
                // Storage details stay server-side.
                return Self::internal("an internal error occurred")
                    .with_source(anyhow::Error::new(err));
            }
        };
        Self::new(status, message, code.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("an internal error occurred").with_source(err)
    }
}
