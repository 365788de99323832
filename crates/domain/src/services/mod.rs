//! Domain services for the space booking backend.
//!
//! Services contain the booking rules that operate on domain models. They
//! are pure and never touch storage.

pub mod approval;
pub mod booking;
pub mod notification;

pub use approval::{
    can_view, check_editable, plan_cancellation, plan_decision, Actor, CancellationPlan,
    DecisionPlan, DecisionPolicy, StaffCapability,
};
pub use booking::{ensure_no_conflict, find_conflict, BookedSlot, ConflictQuery, TimeSlot};
