//! PostgreSQL user store.

use crate::{corrupt_row, store_err};
use async_trait::async_trait;
use roomledger_core::error::{BookingError, Result};
use roomledger_core::store::UserStore;
use roomledger_core::types::{User, UserId};
use sqlx::PgPool;
use uuid::Uuid;

/// Raw `users` row before domain conversion.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    phone: String,
    email: Option<String>,
    address: String,
    nid: Option<String>,
    passport: Option<String>,
    nationality: String,
    profession: String,
    age: i32,
    marital_status: String,
    vehicle_number: Option<String>,
    father_name: String,
    role: String,
}

const USER_COLUMNS: &str = "id, name, phone, email, address, nid, passport, nationality, \
     profession, age, marital_status, vehicle_number, father_name, role";

impl UserRow {
    fn into_domain(self) -> Result<User> {
        Ok(User {
            id: UserId::from_uuid(self.id),
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            nid: self.nid,
            passport: self.passport,
            nationality: self.nationality,
            profession: self.profession,
            age: u32::try_from(self.age).map_err(|_| corrupt_row("age"))?,
            marital_status: self.marital_status,
            vehicle_number: self.vehicle_number,
            father_name: self.father_name,
            role: self.role,
        })
    }
}

/// PostgreSQL-backed user store.
///
/// The `phone` unique constraint carries the identity invariant; violations
/// surface as [`BookingError::PhoneAlreadyRegistered`].
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Creates a store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, name, phone, email, address, nid, passport, nationality,
                                profession, age, marital_status, vehicle_number, father_name, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.phone)
        .bind(user.email.as_deref())
        .bind(&user.address)
        .bind(user.nid.as_deref())
        .bind(user.passport.as_deref())
        .bind(&user.nationality)
        .bind(&user.profession)
        .bind(i64::from(user.age))
        .bind(&user.marital_status)
        .bind(user.vehicle_number.as_deref())
        .bind(&user.father_name)
        .bind(&user.role)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return BookingError::PhoneAlreadyRegistered;
                }
            }
            store_err("create user", &e)
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<User> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| store_err("find_by_id", &e))?;
        row.ok_or(BookingError::NotFound { resource: "user" })?
            .into_domain()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<User> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE phone = $1"))
                .bind(phone)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| store_err("find_by_phone", &e))?;
        row.ok_or(BookingError::NotFound { resource: "user" })?
            .into_domain()
    }
}
