//! Console notification dispatcher for development deployments.

use async_trait::async_trait;
use roomledger_core::store::{NotificationDispatcher, NotifyError};
use roomledger_core::types::{Booking, Party};
use tracing::{info, warn};

/// Dispatcher that logs notifications instead of sending them.
///
/// Useful for development and testing where no real delivery channel is
/// wired up. Production deployments swap in a real provider behind the same
/// trait.
#[derive(Clone, Debug, Default)]
pub struct ConsoleDispatcher;

impl ConsoleDispatcher {
    /// Create a new console dispatcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationDispatcher for ConsoleDispatcher {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        info!(
            recipient = %recipient,
            subject = %subject,
            body = %body,
            "📧 Notification (development mode)"
        );
        Ok(())
    }
}

/// Where a booking confirmation should be delivered.
///
/// Guests get their mobile number; registered users are resolved to a
/// contact by the caller.
#[must_use]
pub fn guest_recipient(booking: &Booking) -> Option<String> {
    match &booking.party {
        Party::Guest(profile) => Some(profile.mobile.clone()),
        Party::User(_) => None,
    }
}

/// Sends a booking confirmation, logging failure instead of propagating it.
///
/// Fire-and-forget: runs after commit and never affects the booking outcome.
pub async fn send_confirmation(
    dispatcher: &dyn NotificationDispatcher,
    recipient: &str,
    booking: &Booking,
) {
    let subject = format!("Booking confirmed: {}", booking.id);
    let body = format!(
        "Your stay from {} to {} is confirmed. Total: {}.",
        booking.check_in, booking.check_out, booking.total_price
    );
    if let Err(err) = dispatcher.send(recipient, &subject, &body).await {
        warn!(booking_id = %booking.id, error = %err, "confirmation delivery failed");
    }
}
