//! Staff approval queue and decisions.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::models::approval::{DecisionRequest, DecisionResponse};
use domain::models::reservation::{ListReservationsQuery, ListReservationsResponse};
use domain::models::{Approval, Pagination};
use domain::BookingError;
use persistence::repositories::{ApprovalRepository, ReservationRepository};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::StaffAuth;
use crate::routes::page_window;
use crate::services::booking::BookingService;

/// GET /api/v1/admin/approvals
///
/// Pending reservations, oldest request first.
pub async fn list_pending(
    State(state): State<AppState>,
    _staff: StaffAuth,
    Query(query): Query<ListReservationsQuery>,
) -> Result<Json<ListReservationsResponse>, ApiError> {
    let (page, per_page) = page_window(&query, state.config.booking.max_page_size);
    let repo = ReservationRepository::new(state.pool.clone());

    let rows = repo
        .list_pending(per_page, Pagination::offset(page, per_page))
        .await?;
    let total = repo.count_pending().await?;

    Ok(Json(ListReservationsResponse {
        data: rows.into_iter().map(Into::into).collect(),
        pagination: Pagination {
            page,
            per_page,
            total,
        },
    }))
}

/// POST /api/v1/admin/reservations/:reservation_id/decision
///
/// Approves or rejects. The single Approval row, the new status and the
/// owner notification are written together. Approving a rejected
/// reservation re-runs the overlap check.
pub async fn decide(
    State(state): State<AppState>,
    staff: StaffAuth,
    Path(reservation_id): Path<i64>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    request.validate()?;

    let response = BookingService::new(state.pool.clone(), state.decision_policy())
        .decide(reservation_id, staff.capability, &request)
        .await?;

    Ok(Json(response))
}

/// GET /api/v1/admin/reservations/:reservation_id/approval
pub async fn get_approval(
    State(state): State<AppState>,
    _staff: StaffAuth,
    Path(reservation_id): Path<i64>,
) -> Result<Json<Approval>, ApiError> {
    if ReservationRepository::new(state.pool.clone())
        .find_by_id(reservation_id)
        .await?
        .is_none()
    {
        return Err(BookingError::ReservationNotFound(reservation_id).into());
    }

    let approval = ApprovalRepository::new(state.pool.clone())
        .find_by_reservation(reservation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No decision recorded yet".to_string()))?;

    Ok(Json(approval.into()))
}
