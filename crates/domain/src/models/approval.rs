//! Approval domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use super::ReservationStatus;

/// Staff decision on a pending reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }

    /// Status a reservation moves to under this decision.
    pub fn resulting_status(&self) -> ReservationStatus {
        match self {
            Decision::Approve => ReservationStatus::Approved,
            Decision::Reject => ReservationStatus::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single decision record attached to a reservation.
///
/// Re-deciding overwrites this record; earlier decisions are not kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Approval {
    pub id: i64,
    pub reservation_id: i64,
    /// None once the approving account has been deleted.
    pub approver_id: Option<Uuid>,
    pub decision: Decision,
    pub notes: String,
    pub decided_at: DateTime<Utc>,
}

/// Request to decide a reservation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct DecisionRequest {
    pub decision: Decision,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: String,
}

/// Response after deciding a reservation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DecisionResponse {
    pub reservation_id: i64,
    pub status: ReservationStatus,
    pub approval: Approval,
}
