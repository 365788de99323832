//! Reservation routes for regular users: booking, history, edits,
//! cancellation and the availability calendar.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::reservation::{
    AvailabilityQuery, CreateReservationRequest, ListReservationsQuery, ListReservationsResponse,
    UpdateReservationRequest,
};
use domain::models::{AvailabilityEvent, Pagination, Reservation, ReservationDetail};
use persistence::repositories::ReservationRepository;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentActor, UserAuth};
use crate::routes::page_window;
use crate::services::booking::BookingService;

fn booking_service(state: &AppState) -> BookingService {
    BookingService::new(state.pool.clone(), state.decision_policy())
}

/// POST /api/v1/reservations
///
/// Books a space. Responds 201 with the Pending reservation, 400 when
/// `end_at <= start_at` or the space is inactive, 404 for an unknown space
/// and 409 when the slot overlaps a pending or approved reservation.
pub async fn create_reservation(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(request): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    request.validate()?;

    let reservation = booking_service(&state).create(&actor, &request).await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /api/v1/reservations/history
///
/// The caller's reservations, most recent start first.
pub async fn list_history(
    State(state): State<AppState>,
    user: UserAuth,
    Query(query): Query<ListReservationsQuery>,
) -> Result<Json<ListReservationsResponse>, ApiError> {
    let (page, per_page) = page_window(&query, state.config.booking.max_page_size);
    let repo = ReservationRepository::new(state.pool.clone());

    let rows = repo
        .list_for_user(user.user_id, per_page, Pagination::offset(page, per_page))
        .await?;
    let total = repo.count_for_user(user.user_id).await?;

    Ok(Json(ListReservationsResponse {
        data: rows.into_iter().map(Into::into).collect(),
        pagination: Pagination {
            page,
            per_page,
            total,
        },
    }))
}

/// GET /api/v1/reservations/:reservation_id
pub async fn get_reservation(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(reservation_id): Path<i64>,
) -> Result<Json<ReservationDetail>, ApiError> {
    let detail = booking_service(&state)
        .detail(reservation_id, &actor)
        .await?;
    Ok(Json(detail))
}

/// PUT /api/v1/reservations/:reservation_id
///
/// Owner-only, while Pending. The new slot is re-checked for overlaps,
/// ignoring the reservation itself.
pub async fn update_reservation(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(reservation_id): Path<i64>,
    Json(request): Json<UpdateReservationRequest>,
) -> Result<Json<Reservation>, ApiError> {
    request.validate()?;

    let reservation = booking_service(&state)
        .update(reservation_id, &actor, &request)
        .await?;

    Ok(Json(reservation))
}

/// POST /api/v1/reservations/:reservation_id/cancel
///
/// Owner or staff. Frees the slot for new bookings.
pub async fn cancel_reservation(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(reservation_id): Path<i64>,
) -> Result<Json<Reservation>, ApiError> {
    let reservation = booking_service(&state)
        .cancel(reservation_id, &actor)
        .await?;
    Ok(Json(reservation))
}

/// GET /api/v1/availability?space_id=
///
/// Calendar feed of pending and approved reservations.
pub async fn availability(
    State(state): State<AppState>,
    _user: UserAuth,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<AvailabilityEvent>>, ApiError> {
    let events = ReservationRepository::new(state.pool.clone())
        .list_availability(query.space_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(events))
}
