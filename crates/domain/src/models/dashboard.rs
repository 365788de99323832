//! Dashboard views for users and staff.

use serde::Serialize;

use super::ReservationDetail;

/// Number of entries shown in each user dashboard list.
pub const USER_DASHBOARD_LIMIT: i64 = 5;

/// A user's own pending and upcoming bookings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserDashboard {
    /// Most recently created pending reservations.
    pub pending: Vec<ReservationDetail>,
    /// Approved reservations that have not started yet, soonest first.
    pub upcoming: Vec<ReservationDetail>,
    pub unread_notifications: i64,
}

/// Every reservation awaiting a staff decision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StaffDashboard {
    pub pending: Vec<ReservationDetail>,
    pub pending_count: i64,
}
