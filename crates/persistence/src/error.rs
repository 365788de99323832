//! Errors returned by transactional repository operations.

use domain::BookingError;
use thiserror::Error;

/// SQLSTATE raised when a SERIALIZABLE transaction loses a race.
const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE raised by the reservation exclusion constraint.
const EXCLUSION_VIOLATION: &str = "23P01";
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// The transaction lost a serialization race and may be retried.
    #[error("overlaps with another reservation for this space")]
    SerializationFailure,

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(SERIALIZATION_FAILURE) => return StoreError::SerializationFailure,
                Some(EXCLUSION_VIOLATION) => {
                    return StoreError::Booking(BookingError::storage_conflict());
                }
                Some(CHECK_VIOLATION)
                    if db_err.constraint() == Some("reservation_end_after_start") =>
                {
                    return StoreError::Booking(BookingError::InvalidInterval);
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::Booking(BookingError::Conflict { .. }) | StoreError::SerializationFailure
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_stays_database_error() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_serialization_failure_counts_as_conflict() {
        let err = StoreError::SerializationFailure;
        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "overlaps with another reservation for this space"
        );
    }

    #[test]
    fn test_booking_error_passes_through() {
        let err: StoreError = BookingError::storage_conflict().into();
        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "overlaps with another reservation for this space"
        );
    }
}
