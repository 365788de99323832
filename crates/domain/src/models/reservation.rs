//! Reservation domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Approved => "approved",
            ReservationStatus::Rejected => "rejected",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Human readable label used in calendars and reports.
    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Approved => "Approved",
            ReservationStatus::Rejected => "Rejected",
            ReservationStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether a reservation in this status holds its time slot.
    pub fn blocks(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Approved)
    }

    /// Statuses that take part in conflict detection.
    pub const BLOCKING: [ReservationStatus; 2] =
        [ReservationStatus::Pending, ReservationStatus::Approved];
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "approved" => Ok(ReservationStatus::Approved),
            "rejected" => Ok(ReservationStatus::Rejected),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            _ => Err(format!("Invalid reservation status: {}", s)),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's request to use a space for an interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Reservation {
    pub id: i64,
    pub user_id: Uuid,
    pub space_id: i64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub purpose: String,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Reservation joined with its owner and space for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReservationDetail {
    pub id: i64,
    pub user_id: Uuid,
    pub user_email: String,
    pub space_id: i64,
    pub space_name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub purpose: String,
    pub status: ReservationStatus,
    pub status_label: &'static str,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a reservation.
///
/// The interval itself is checked by the booking engine so that the rule
/// lives in one place.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateReservationRequest {
    #[validate(range(min = 1, message = "Space id must be positive"))]
    pub space_id: i64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    #[validate(length(max = 250, message = "Purpose must be at most 250 characters"))]
    pub purpose: String,
}

/// Request payload for editing a pending reservation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateReservationRequest {
    #[validate(range(min = 1, message = "Space id must be positive"))]
    pub space_id: Option<i64>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    #[validate(length(max = 250, message = "Purpose must be at most 250 characters"))]
    pub purpose: Option<String>,
}

/// Calendar entry returned by the availability query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityEvent {
    pub id: i64,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AvailabilityEvent {
    pub fn new(
        id: i64,
        space_name: &str,
        status: ReservationStatus,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: format!("{} ({})", space_name, status.label()),
            start,
            end,
        }
    }
}

/// Query parameters for the availability calendar.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub space_id: Option<i64>,
}

/// Query parameters for paginated reservation listings.
#[derive(Debug, Clone, Deserialize)]
pub struct ListReservationsQuery {
    #[serde(default = "super::default_page")]
    pub page: i64,
    #[serde(default = "super::default_per_page")]
    pub per_page: i64,
}

/// Response for paginated reservation listings.
#[derive(Debug, Clone, Serialize)]
pub struct ListReservationsResponse {
    pub data: Vec<ReservationDetail>,
    pub pagination: super::Pagination,
}
