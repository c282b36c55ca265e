//! PostgreSQL coupon store.
//!
//! Lookup and staff lifecycle only. Redemption is owned by the ledger so a
//! coupon can never be spent outside a committed booking.

use crate::{corrupt_row, store_err};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roomledger_core::error::{BookingError, Result};
use roomledger_core::store::CouponStore;
use roomledger_core::types::{Coupon, CouponId};
use sqlx::PgPool;
use uuid::Uuid;

/// Raw `coupons` row before domain conversion.
#[derive(sqlx::FromRow)]
pub(crate) struct CouponRow {
    pub id: Uuid,
    pub code: String,
    pub percent: i16,
    pub quantity: i32,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

pub(crate) const COUPON_COLUMNS: &str = "id, code, percent, quantity, expires_at, is_active";

impl CouponRow {
    pub(crate) fn into_domain(self) -> Result<Coupon> {
        Ok(Coupon {
            id: CouponId::from_uuid(self.id),
            code: self.code,
            percent: u8::try_from(self.percent).map_err(|_| corrupt_row("percent"))?,
            quantity: u32::try_from(self.quantity).map_err(|_| corrupt_row("quantity"))?,
            expires_at: self.expires_at,
            is_active: self.is_active,
        })
    }
}

/// PostgreSQL-backed coupon store.
#[derive(Clone)]
pub struct PgCouponStore {
    pool: PgPool,
}

impl PgCouponStore {
    /// Creates a store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CouponStore for PgCouponStore {
    async fn find_by_code(&self, code: &str) -> Result<Coupon> {
        let row: Option<CouponRow> = sqlx::query_as(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("find_by_code", &e))?;
        row.ok_or(BookingError::NotFound { resource: "coupon" })?
            .into_domain()
    }

    async fn create(&self, coupon: &Coupon) -> Result<()> {
        sqlx::query(
            "INSERT INTO coupons (id, code, percent, quantity, expires_at, is_active)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(coupon.id.as_uuid())
        .bind(&coupon.code)
        .bind(i16::from(coupon.percent))
        .bind(i64::from(coupon.quantity))
        .bind(coupon.expires_at)
        .bind(coupon.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return BookingError::Store("coupon code already exists".to_string());
                }
            }
            store_err("create coupon", &e)
        })?;
        Ok(())
    }

    async fn deactivate(&self, code: &str) -> Result<()> {
        let result = sqlx::query("UPDATE coupons SET is_active = FALSE WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| store_err("deactivate coupon", &e))?;
        if result.rows_affected() == 0 {
            return Err(BookingError::NotFound { resource: "coupon" });
        }
        Ok(())
    }
}
