//! Domain models for the space booking backend.

pub mod approval;
pub mod dashboard;
pub mod notification;
pub mod profile;
pub mod reservation;
pub mod resource;
pub mod space;
pub mod user;

pub use approval::{Approval, Decision};
pub use dashboard::{StaffDashboard, UserDashboard};
pub use notification::Notification;
pub use profile::Profile;
pub use reservation::{AvailabilityEvent, Reservation, ReservationDetail, ReservationStatus};
pub use resource::Resource;
pub use space::Space;
pub use user::User;

/// Pagination info for list responses.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl Pagination {
    /// Row offset for the page, with pages starting at 1. Saturates instead
    /// of overflowing for absurd page numbers.
    pub fn offset(page: i64, per_page: i64) -> i64 {
        (page.max(1) - 1).saturating_mul(per_page.max(0))
    }
}

pub(crate) fn default_page() -> i64 {
    1
}

pub(crate) fn default_per_page() -> i64 {
    20
}
