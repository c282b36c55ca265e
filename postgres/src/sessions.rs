//! Bearer credential verification against the `sessions` table.
//!
//! The auth provider that issues tokens is external; this side only answers
//! "whose token is this, and is it still live".

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roomledger_core::store::{AuthRejection, TokenVerifier};
use roomledger_core::types::UserId;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed token verifier.
#[derive(Clone)]
pub struct PgTokenVerifier {
    pool: PgPool,
}

impl PgTokenVerifier {
    /// Creates a verifier over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenVerifier for PgTokenVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AuthRejection> {
        let row: Option<(Uuid, DateTime<Utc>)> =
            sqlx::query_as("SELECT user_id, expires_at FROM sessions WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    // The port contract is verify-or-reject; a storage
                    // failure rejects the credential and is logged here.
                    tracing::warn!(error = %e, "session lookup failed");
                    AuthRejection::Unknown
                })?;
        match row {
            Some((user_id, expires_at)) if expires_at > Utc::now() => {
                Ok(UserId::from_uuid(user_id))
            }
            Some(_) => Err(AuthRejection::Expired),
            None => Err(AuthRejection::Unknown),
        }
    }
}
