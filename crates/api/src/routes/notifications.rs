//! In-app notifications.

use axum::{extract::State, Json};
use domain::models::notification::{ListNotificationsResponse, MarkReadResponse};
use persistence::repositories::NotificationRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

const NOTIFICATION_LIST_LIMIT: i64 = 50;

/// GET /api/v1/notifications
///
/// The caller's latest notifications, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<ListNotificationsResponse>, ApiError> {
    let repo = NotificationRepository::new(state.pool.clone());

    let data = repo
        .list_for_user(user.user_id, NOTIFICATION_LIST_LIMIT)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let unread_count = repo.count_unread(user.user_id).await?;

    Ok(Json(ListNotificationsResponse { data, unread_count }))
}

/// POST /api/v1/notifications/mark-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let updated = NotificationRepository::new(state.pool.clone())
        .mark_all_read(user.user_id)
        .await?;

    tracing::debug!(user_id = %user.user_id, updated, "Notifications marked read");
    Ok(Json(MarkReadResponse { updated }))
}
