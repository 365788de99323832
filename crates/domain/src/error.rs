//! Errors raised by the booking rules.

use thiserror::Error;

use crate::models::ReservationStatus;

/// A booking rule was violated. No state has been changed when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("end must be after start")]
    InvalidInterval,

    #[error("overlaps with another reservation for this space")]
    Conflict { conflicting_id: Option<i64> },

    #[error("staff privileges are required")]
    NotStaff,

    #[error("only the owner can modify this reservation")]
    NotOwner,

    #[error("reservation {0} not found")]
    ReservationNotFound(i64),

    #[error("space {0} not found")]
    SpaceNotFound(i64),

    #[error("space {0} is not accepting reservations")]
    SpaceInactive(i64),

    #[error("cannot {action} a reservation that is {from}")]
    InvalidTransition {
        from: ReservationStatus,
        action: &'static str,
    },

    #[error("reservation has already been {0} and decisions are final")]
    AlreadyDecided(ReservationStatus),
}

impl BookingError {
    /// Conflict raised by storage constraints, where the other row is unknown.
    pub fn storage_conflict() -> Self {
        BookingError::Conflict {
            conflicting_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_is_user_facing() {
        let err = BookingError::Conflict {
            conflicting_id: Some(7),
        };
        assert_eq!(
            err.to_string(),
            "overlaps with another reservation for this space"
        );
        assert_eq!(BookingError::storage_conflict().to_string(), err.to_string());
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = BookingError::InvalidTransition {
            from: ReservationStatus::Cancelled,
            action: "decide",
        };
        assert_eq!(err.to_string(), "cannot decide a reservation that is cancelled");
    }

    #[test]
    fn test_already_decided_message() {
        let err = BookingError::AlreadyDecided(ReservationStatus::Approved);
        assert_eq!(
            err.to_string(),
            "reservation has already been approved and decisions are final"
        );
    }
}
