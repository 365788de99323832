//! Space catalogue. Reads are open to any signed-in user; writes are staff-only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::space::{CreateSpaceRequest, ListSpacesQuery, UpdateSpaceRequest};
use domain::models::Space;
use domain::BookingError;
use persistence::repositories::SpaceRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{StaffAuth, UserAuth};

/// GET /api/v1/spaces?active=
pub async fn list_spaces(
    State(state): State<AppState>,
    _user: UserAuth,
    Query(query): Query<ListSpacesQuery>,
) -> Result<Json<Vec<Space>>, ApiError> {
    let spaces = SpaceRepository::new(state.pool.clone())
        .list(query.active)
        .await?;
    Ok(Json(spaces.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/spaces/:space_id
pub async fn get_space(
    State(state): State<AppState>,
    _user: UserAuth,
    Path(space_id): Path<i64>,
) -> Result<Json<Space>, ApiError> {
    let space = SpaceRepository::new(state.pool.clone())
        .find_by_id(space_id)
        .await?
        .ok_or(BookingError::SpaceNotFound(space_id))?;
    Ok(Json(space.into()))
}

/// POST /api/v1/admin/spaces
pub async fn create_space(
    State(state): State<AppState>,
    staff: StaffAuth,
    Json(request): Json<CreateSpaceRequest>,
) -> Result<(StatusCode, Json<Space>), ApiError> {
    request.validate()?;

    let space = SpaceRepository::new(state.pool.clone())
        .create(
            request.name.trim(),
            request.location.trim(),
            request.capacity,
            request.is_active,
        )
        .await?;

    info!(space_id = space.id, user_id = %staff.actor.user_id, "Space created");
    Ok((StatusCode::CREATED, Json(space.into())))
}

/// PUT /api/v1/admin/spaces/:space_id
///
/// Deactivating a space stops new bookings; existing reservations stay.
pub async fn update_space(
    State(state): State<AppState>,
    staff: StaffAuth,
    Path(space_id): Path<i64>,
    Json(request): Json<UpdateSpaceRequest>,
) -> Result<Json<Space>, ApiError> {
    request.validate()?;

    let space = SpaceRepository::new(state.pool.clone())
        .update(
            space_id,
            request.name.as_deref().map(str::trim),
            request.location.as_deref().map(str::trim),
            request.capacity,
            request.is_active,
        )
        .await?
        .ok_or(BookingError::SpaceNotFound(space_id))?;

    info!(space_id, user_id = %staff.actor.user_id, "Space updated");
    Ok(Json(space.into()))
}

/// DELETE /api/v1/admin/spaces/:space_id
///
/// Removes the space together with its reservations; resources tagged to
/// it are detached.
pub async fn delete_space(
    State(state): State<AppState>,
    staff: StaffAuth,
    Path(space_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = SpaceRepository::new(state.pool.clone())
        .delete(space_id)
        .await?;

    if !deleted {
        return Err(BookingError::SpaceNotFound(space_id).into());
    }

    info!(space_id, user_id = %staff.actor.user_id, "Space deleted");
    Ok(StatusCode::NO_CONTENT)
}
