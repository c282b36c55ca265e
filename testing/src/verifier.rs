//! Static token verifier for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roomledger_core::store::{AuthRejection, TokenVerifier};
use roomledger_core::types::UserId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Verifier over a fixed token table.
#[derive(Clone, Debug, Default)]
pub struct StaticTokenVerifier {
    tokens: Arc<Mutex<HashMap<String, (UserId, DateTime<Utc>)>>>,
}

impl StaticTokenVerifier {
    /// Creates an empty verifier; every token is rejected until inserted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token for a user with an expiry.
    ///
    /// # Panics
    ///
    /// Panics if the verifier lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn insert(&self, token: impl Into<String>, user: UserId, expires_at: DateTime<Utc>) {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.into(), (user, expires_at));
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    #[allow(clippy::unwrap_used)]
    async fn verify(&self, token: &str) -> Result<UserId, AuthRejection> {
        match self.tokens.lock().unwrap().get(token) {
            Some((user, expires_at)) if *expires_at > Utc::now() => Ok(*user),
            Some(_) => Err(AuthRejection::Expired),
            None => Err(AuthRejection::Unknown),
        }
    }
}
