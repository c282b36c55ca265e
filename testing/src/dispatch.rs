//! Recording notification dispatcher.

use async_trait::async_trait;
use roomledger_core::store::{NotificationDispatcher, NotifyError};
use std::sync::{Arc, Mutex};

/// A message captured by [`RecordingDispatcher`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    /// Recipient address
    pub recipient: String,
    /// Message subject
    pub subject: String,
    /// Message body
    pub body: String,
}

/// Dispatcher that records messages instead of sending them.
///
/// Can be told to fail, to verify that delivery failures never affect
/// booking outcomes.
#[derive(Clone, Debug, Default)]
pub struct RecordingDispatcher {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    fail: Arc<Mutex<bool>>,
}

impl RecordingDispatcher {
    /// Creates a dispatcher that records and succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent send fail.
    ///
    /// # Panics
    ///
    /// Panics if the dispatcher lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn fail_next_sends(&self) {
        *self.fail.lock().unwrap() = true;
    }

    /// Messages captured so far.
    ///
    /// # Panics
    ///
    /// Panics if the dispatcher lock is poisoned.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    #[allow(clippy::unwrap_used)]
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        if *self.fail.lock().unwrap() {
            return Err(NotifyError("dispatcher set to fail".to_string()));
        }
        self.sent.lock().unwrap().push(SentMessage {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
