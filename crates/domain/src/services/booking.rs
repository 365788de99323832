//! Reservation conflict checking.
//!
//! Intervals are half-open: `[start, end)`. Two reservations in the same space
//! conflict when both hold their slot (pending or approved) and
//! `a.start < b.end && a.end > b.start`. Touching intervals do not conflict.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::BookingError;
use crate::models::ReservationStatus;

/// A validated half-open interval with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, BookingError> {
        if end <= start {
            return Err(BookingError::InvalidInterval);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// An existing reservation as seen by the conflict checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedSlot {
    pub reservation_id: i64,
    pub space_id: i64,
    pub slot: TimeSlot,
    pub status: ReservationStatus,
}

/// A candidate booking to check against existing reservations.
#[derive(Debug, Clone, Copy)]
pub struct ConflictQuery {
    pub space_id: i64,
    pub slot: TimeSlot,
    /// Reservation being re-validated, so it does not conflict with itself.
    pub exclude: Option<i64>,
}

impl ConflictQuery {
    pub fn new(space_id: i64, slot: TimeSlot) -> Self {
        Self {
            space_id,
            slot,
            exclude: None,
        }
    }

    pub fn excluding(mut self, reservation_id: i64) -> Self {
        self.exclude = Some(reservation_id);
        self
    }

    fn is_blocked_by(&self, booked: &BookedSlot) -> bool {
        booked.space_id == self.space_id
            && booked.status.blocks()
            && Some(booked.reservation_id) != self.exclude
            && booked.slot.overlaps(&self.slot)
    }
}

/// Returns the first existing reservation that blocks the candidate, if any.
pub fn find_conflict<'a, I>(query: &ConflictQuery, existing: I) -> Option<&'a BookedSlot>
where
    I: IntoIterator<Item = &'a BookedSlot>,
{
    existing.into_iter().find(|booked| query.is_blocked_by(booked))
}

pub fn ensure_no_conflict<'a, I>(query: &ConflictQuery, existing: I) -> Result<(), BookingError>
where
    I: IntoIterator<Item = &'a BookedSlot>,
{
    match find_conflict(query, existing) {
        Some(booked) => Err(BookingError::Conflict {
            conflicting_id: Some(booked.reservation_id),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
    }

    fn slot(from: (u32, u32), to: (u32, u32)) -> TimeSlot {
        TimeSlot::new(at(from.0, from.1), at(to.0, to.1)).unwrap()
    }

    fn booked(id: i64, space_id: i64, s: TimeSlot, status: ReservationStatus) -> BookedSlot {
        BookedSlot {
            reservation_id: id,
            space_id,
            slot: s,
            status,
        }
    }

    #[test]
    fn test_slot_requires_end_after_start() {
        assert_eq!(
            TimeSlot::new(at(10, 0), at(10, 0)),
            Err(BookingError::InvalidInterval)
        );
        assert_eq!(
            TimeSlot::new(at(11, 0), at(10, 0)),
            Err(BookingError::InvalidInterval)
        );
        assert_eq!(slot((10, 0), (10, 1)).duration(), Duration::minutes(1));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = slot((10, 0), (11, 0));
        let b = slot((10, 30), (11, 30));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_slots_do_not_overlap() {
        let a = slot((10, 0), (11, 0));
        let b = slot((11, 0), (12, 0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = slot((9, 0), (13, 0));
        let inner = slot((10, 0), (10, 15));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(inner.overlaps(&inner));
    }

    #[test]
    fn test_conflict_with_pending_and_approved() {
        let existing = vec![
            booked(1, 1, slot((10, 0), (11, 0)), ReservationStatus::Pending),
            booked(2, 1, slot((14, 0), (15, 0)), ReservationStatus::Approved),
        ];

        let q = ConflictQuery::new(1, slot((10, 30), (11, 30)));
        assert_eq!(find_conflict(&q, &existing).map(|b| b.reservation_id), Some(1));

        let q = ConflictQuery::new(1, slot((14, 59), (16, 0)));
        assert_eq!(
            ensure_no_conflict(&q, &existing),
            Err(BookingError::Conflict {
                conflicting_id: Some(2)
            })
        );
    }

    #[test]
    fn test_rejected_and_cancelled_do_not_block() {
        let existing = vec![
            booked(1, 1, slot((10, 0), (11, 0)), ReservationStatus::Rejected),
            booked(2, 1, slot((10, 0), (11, 0)), ReservationStatus::Cancelled),
        ];
        let q = ConflictQuery::new(1, slot((10, 0), (11, 0)));
        assert!(ensure_no_conflict(&q, &existing).is_ok());
    }

    #[test]
    fn test_other_spaces_do_not_block() {
        let existing = vec![booked(1, 2, slot((10, 0), (11, 0)), ReservationStatus::Approved)];
        let q = ConflictQuery::new(1, slot((10, 0), (11, 0)));
        assert!(ensure_no_conflict(&q, &existing).is_ok());
    }

    #[test]
    fn test_excluded_reservation_does_not_conflict_with_itself() {
        let existing = vec![booked(5, 1, slot((10, 0), (11, 0)), ReservationStatus::Pending)];
        let q = ConflictQuery::new(1, slot((10, 15), (11, 15))).excluding(5);
        assert!(ensure_no_conflict(&q, &existing).is_ok());

        let other = ConflictQuery::new(1, slot((10, 15), (11, 15))).excluding(6);
        assert!(ensure_no_conflict(&other, &existing).is_err());
    }

    #[test]
    fn test_no_existing_reservations() {
        let q = ConflictQuery::new(1, slot((8, 0), (9, 0)));
        assert!(ensure_no_conflict(&q, &Vec::<BookedSlot>::new()).is_ok());
    }
}
