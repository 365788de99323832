//! Approval entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Decision;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for approval decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "approval_decision", rename_all = "lowercase")]
pub enum ApprovalDecisionDb {
    Approve,
    Reject,
}

impl From<Decision> for ApprovalDecisionDb {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approve => ApprovalDecisionDb::Approve,
            Decision::Reject => ApprovalDecisionDb::Reject,
        }
    }
}

impl From<ApprovalDecisionDb> for Decision {
    fn from(decision: ApprovalDecisionDb) -> Self {
        match decision {
            ApprovalDecisionDb::Approve => Decision::Approve,
            ApprovalDecisionDb::Reject => Decision::Reject,
        }
    }
}

/// Database row mapping for the approvals table.
#[derive(Debug, Clone, FromRow)]
pub struct ApprovalEntity {
    pub id: i64,
    pub reservation_id: i64,
    pub approver_id: Option<Uuid>,
    pub decision: ApprovalDecisionDb,
    pub notes: String,
    pub decided_at: DateTime<Utc>,
}

impl From<ApprovalEntity> for domain::models::Approval {
    fn from(entity: ApprovalEntity) -> Self {
        Self {
            id: entity.id,
            reservation_id: entity.reservation_id,
            approver_id: entity.approver_id,
            decision: entity.decision.into(),
            notes: entity.notes,
            decided_at: entity.decided_at,
        }
    }
}
