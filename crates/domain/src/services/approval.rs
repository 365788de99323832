//! Reservation lifecycle transitions.
//!
//! ```text
//! Pending ──approve──▶ Approved ──cancel──▶ Cancelled
//!    │                    ▲
//!    ├──reject──▶ Rejected┘ (re-decision, policy permitting)
//!    └──cancel──▶ Cancelled
//! ```
//!
//! Every function here is pure: it inspects a reservation snapshot and returns
//! a plan. The persistence layer applies the plan inside one transaction.

use uuid::Uuid;

use crate::error::BookingError;
use crate::models::{Decision, Reservation, ReservationStatus};

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_staff: bool,
}

impl Actor {
    pub fn new(user_id: Uuid, is_staff: bool) -> Self {
        Self { user_id, is_staff }
    }

    /// Proof that this actor may decide reservations.
    pub fn staff_capability(&self) -> Option<StaffCapability> {
        self.is_staff.then_some(StaffCapability {
            approver_id: self.user_id,
        })
    }

    pub fn require_staff(&self) -> Result<StaffCapability, BookingError> {
        self.staff_capability().ok_or(BookingError::NotStaff)
    }
}

/// Can only be obtained from an [`Actor`] whose staff flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffCapability {
    approver_id: Uuid,
}

impl StaffCapability {
    pub fn approver_id(&self) -> Uuid {
        self.approver_id
    }
}

/// Whether an approved or rejected reservation may be decided again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionPolicy {
    /// A new decision overwrites the previous one.
    #[default]
    LastWriteWins,
    /// The first decision is final.
    FinalOnce,
}

impl DecisionPolicy {
    pub fn from_allow_redecision(allow: bool) -> Self {
        if allow {
            DecisionPolicy::LastWriteWins
        } else {
            DecisionPolicy::FinalOnce
        }
    }
}

/// Changes to apply for a staff decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionPlan {
    pub reservation_id: i64,
    pub owner_id: Uuid,
    pub approver_id: Uuid,
    pub decision: Decision,
    pub notes: String,
    pub previous_status: ReservationStatus,
    pub new_status: ReservationStatus,
    /// Set when the reservation starts holding its slot again and must be
    /// re-checked against the other reservations of its space.
    pub requires_conflict_check: bool,
}

pub fn plan_decision(
    capability: StaffCapability,
    reservation: &Reservation,
    decision: Decision,
    notes: impl Into<String>,
    policy: DecisionPolicy,
) -> Result<DecisionPlan, BookingError> {
    let previous = reservation.status;

    match previous {
        ReservationStatus::Cancelled => {
            return Err(BookingError::InvalidTransition {
                from: previous,
                action: "decide",
            })
        }
        ReservationStatus::Approved | ReservationStatus::Rejected
            if policy == DecisionPolicy::FinalOnce =>
        {
            return Err(BookingError::AlreadyDecided(previous))
        }
        _ => {}
    }

    let new_status = decision.resulting_status();

    Ok(DecisionPlan {
        reservation_id: reservation.id,
        owner_id: reservation.user_id,
        approver_id: capability.approver_id(),
        decision,
        notes: notes.into(),
        previous_status: previous,
        new_status,
        requires_conflict_check: new_status.blocks() && !previous.blocks(),
    })
}

/// Changes to apply for a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationPlan {
    pub reservation_id: i64,
    pub owner_id: Uuid,
    pub previous_status: ReservationStatus,
    /// Staff cancelled somebody else's reservation.
    pub notify_owner: bool,
}

pub fn plan_cancellation(
    actor: &Actor,
    reservation: &Reservation,
) -> Result<CancellationPlan, BookingError> {
    let is_owner = reservation.is_owned_by(actor.user_id);
    if !is_owner && !actor.is_staff {
        return Err(BookingError::NotOwner);
    }
    if !reservation.status.blocks() {
        return Err(BookingError::InvalidTransition {
            from: reservation.status,
            action: "cancel",
        });
    }

    Ok(CancellationPlan {
        reservation_id: reservation.id,
        owner_id: reservation.user_id,
        previous_status: reservation.status,
        notify_owner: !is_owner,
    })
}

/// Only the owner may edit, and only while the reservation awaits a decision.
pub fn check_editable(actor: &Actor, reservation: &Reservation) -> Result<(), BookingError> {
    if !reservation.is_owned_by(actor.user_id) {
        return Err(BookingError::NotOwner);
    }
    if reservation.status != ReservationStatus::Pending {
        return Err(BookingError::InvalidTransition {
            from: reservation.status,
            action: "edit",
        });
    }
    Ok(())
}

/// Owners see their own reservations; staff see all of them.
pub fn can_view(actor: &Actor, owner_id: Uuid) -> bool {
    actor.is_staff || actor.user_id == owner_id
}
