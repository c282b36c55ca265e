//! Pinnable clock for deterministic tests.

use chrono::{DateTime, Duration, Utc};
use roomledger_core::store::Clock;
use std::sync::Mutex;

/// A clock that stands still until told otherwise.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Creates a clock pinned at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Creates a clock pinned at the current wall time.
    #[must_use]
    pub fn now_pinned() -> Self {
        Self::new(Utc::now())
    }

    /// Moves the clock forward.
    ///
    /// # Panics
    ///
    /// Panics if the clock lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }

    /// Re-pins the clock to a specific instant.
    ///
    /// # Panics
    ///
    /// Panics if the clock lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    #[allow(clippy::unwrap_used)]
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
