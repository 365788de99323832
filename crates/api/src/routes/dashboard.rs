//! Dashboards for users and staff.

use axum::{extract::State, Json};
use chrono::Utc;
use domain::models::dashboard::USER_DASHBOARD_LIMIT;
use domain::models::{StaffDashboard, UserDashboard};
use persistence::repositories::{NotificationRepository, ReservationRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{StaffAuth, UserAuth};

/// GET /api/v1/me/dashboard
///
/// Latest pending requests, upcoming approved bookings and the unread
/// notification count.
pub async fn user_dashboard(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<UserDashboard>, ApiError> {
    let reservations = ReservationRepository::new(state.pool.clone());

    let pending = reservations
        .list_recent_pending_for_user(user.user_id, USER_DASHBOARD_LIMIT)
        .await?;
    let upcoming = reservations
        .list_upcoming_approved_for_user(user.user_id, Utc::now(), USER_DASHBOARD_LIMIT)
        .await?;
    let unread_notifications = NotificationRepository::new(state.pool.clone())
        .count_unread(user.user_id)
        .await?;

    Ok(Json(UserDashboard {
        pending: pending.into_iter().map(Into::into).collect(),
        upcoming: upcoming.into_iter().map(Into::into).collect(),
        unread_notifications,
    }))
}

/// GET /api/v1/admin/dashboard
///
/// Pending reservations awaiting a decision, capped at the staff page size.
pub async fn staff_dashboard(
    State(state): State<AppState>,
    _staff: StaffAuth,
) -> Result<Json<StaffDashboard>, ApiError> {
    let reservations = ReservationRepository::new(state.pool.clone());

    let pending = reservations
        .list_pending(state.config.booking.max_page_size, 0)
        .await?;
    let pending_count = reservations.count_pending().await?;

    Ok(Json(StaffDashboard {
        pending: pending.into_iter().map(Into::into).collect(),
        pending_count,
    }))
}
