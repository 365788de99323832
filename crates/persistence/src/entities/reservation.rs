//! Reservation entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{AvailabilityEvent, ReservationStatus};
use domain::services::{BookedSlot, TimeSlot};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for reservation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
pub enum ReservationStatusDb {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl From<ReservationStatus> for ReservationStatusDb {
    fn from(status: ReservationStatus) -> Self {
        match status {
            ReservationStatus::Pending => ReservationStatusDb::Pending,
            ReservationStatus::Approved => ReservationStatusDb::Approved,
            ReservationStatus::Rejected => ReservationStatusDb::Rejected,
            ReservationStatus::Cancelled => ReservationStatusDb::Cancelled,
        }
    }
}

impl From<ReservationStatusDb> for ReservationStatus {
    fn from(status: ReservationStatusDb) -> Self {
        match status {
            ReservationStatusDb::Pending => ReservationStatus::Pending,
            ReservationStatusDb::Approved => ReservationStatus::Approved,
            ReservationStatusDb::Rejected => ReservationStatus::Rejected,
            ReservationStatusDb::Cancelled => ReservationStatus::Cancelled,
        }
    }
}

/// Database row mapping for the reservations table.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub space_id: i64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub purpose: String,
    pub status: ReservationStatusDb,
    pub created_at: DateTime<Utc>,
}

impl From<ReservationEntity> for domain::models::Reservation {
    fn from(entity: ReservationEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            space_id: entity.space_id,
            start_at: entity.start_at,
            end_at: entity.end_at,
            purpose: entity.purpose,
            status: entity.status.into(),
            created_at: entity.created_at,
        }
    }
}

impl ReservationEntity {
    /// View used by the conflict checker. Rows violating the end-after-start
    /// check cannot exist, so a failed conversion is skipped.
    pub fn booked_slot(&self) -> Option<BookedSlot> {
        TimeSlot::new(self.start_at, self.end_at)
            .ok()
            .map(|slot| BookedSlot {
                reservation_id: self.id,
                space_id: self.space_id,
                slot,
                status: self.status.into(),
            })
    }
}

/// Reservation joined with owner email and space name.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationWithDetailsEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub user_email: String,
    pub space_id: i64,
    pub space_name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub purpose: String,
    pub status: ReservationStatusDb,
    pub created_at: DateTime<Utc>,
}

impl From<ReservationWithDetailsEntity> for domain::models::ReservationDetail {
    fn from(entity: ReservationWithDetailsEntity) -> Self {
        let status: ReservationStatus = entity.status.into();
        Self {
            id: entity.id,
            user_id: entity.user_id,
            user_email: entity.user_email,
            space_id: entity.space_id,
            space_name: entity.space_name,
            start_at: entity.start_at,
            end_at: entity.end_at,
            purpose: entity.purpose,
            status,
            status_label: status.label(),
            created_at: entity.created_at,
        }
    }
}

/// Row for the availability calendar.
#[derive(Debug, Clone, FromRow)]
pub struct AvailabilityRowEntity {
    pub id: i64,
    pub space_name: String,
    pub status: ReservationStatusDb,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl From<AvailabilityRowEntity> for AvailabilityEvent {
    fn from(row: AvailabilityRowEntity) -> Self {
        AvailabilityEvent::new(
            row.id,
            &row.space_name,
            row.status.into(),
            row.start_at,
            row.end_at,
        )
    }
}

/// Row for the CSV report.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationExportEntity {
    pub id: i64,
    pub user_email: String,
    pub space_name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: ReservationStatusDb,
}
