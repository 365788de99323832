//! Notification messages produced by reservation lifecycle events.
//!
//! Delivery is a row in the notifications table written in the same
//! transaction as the triggering change, so this module only builds text.

use chrono::{DateTime, Utc};

use crate::models::notification::MAX_MESSAGE_LEN;
use crate::models::Decision;

/// Sent to every active staff member when a reservation is created.
pub const NEW_PENDING_MESSAGE: &str = "New reservation pending approval.";

/// Short label identifying a reservation, e.g. `Room A · 2025-03-10 10:00`.
pub fn reservation_label(space_name: &str, start: DateTime<Utc>) -> String {
    format!("{} · {}", space_name, start.format("%Y-%m-%d %H:%M"))
}

/// Message for the owner after a staff decision.
pub fn decision_message(space_name: &str, start: DateTime<Utc>, decision: Decision) -> String {
    let outcome = match decision {
        Decision::Approve => "approved",
        Decision::Reject => "rejected",
    };
    clamp(format!(
        "Your reservation '{}' was {}.",
        reservation_label(space_name, start),
        outcome
    ))
}

/// Message for the owner when staff cancels their reservation.
pub fn cancellation_message(space_name: &str, start: DateTime<Utc>) -> String {
    clamp(format!(
        "Your reservation '{}' was cancelled by staff.",
        reservation_label(space_name, start)
    ))
}

fn clamp(mut message: String) -> String {
    if message.chars().count() > MAX_MESSAGE_LEN {
        message = message.chars().take(MAX_MESSAGE_LEN - 1).collect();
        message.push('…');
    }
    message
}
