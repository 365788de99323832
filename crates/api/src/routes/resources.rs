//! Equipment catalogue.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::resource::{CreateResourceRequest, ListResourcesQuery, UpdateResourceRequest};
use domain::models::Resource;
use persistence::repositories::ResourceRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{StaffAuth, UserAuth};

fn not_found(resource_id: i64) -> ApiError {
    ApiError::NotFound(format!("resource {} not found", resource_id))
}

/// GET /api/v1/resources?space_id=
pub async fn list_resources(
    State(state): State<AppState>,
    _user: UserAuth,
    Query(query): Query<ListResourcesQuery>,
) -> Result<Json<Vec<Resource>>, ApiError> {
    let resources = ResourceRepository::new(state.pool.clone())
        .list(query.space_id)
        .await?;
    Ok(Json(resources.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/resources/:resource_id
pub async fn get_resource(
    State(state): State<AppState>,
    _user: UserAuth,
    Path(resource_id): Path<i64>,
) -> Result<Json<Resource>, ApiError> {
    let resource = ResourceRepository::new(state.pool.clone())
        .find_by_id(resource_id)
        .await?
        .ok_or_else(|| not_found(resource_id))?;
    Ok(Json(resource.into()))
}

/// POST /api/v1/admin/resources
///
/// An unknown `space_id` is answered with 404.
pub async fn create_resource(
    State(state): State<AppState>,
    staff: StaffAuth,
    Json(request): Json<CreateResourceRequest>,
) -> Result<(StatusCode, Json<Resource>), ApiError> {
    request.validate()?;

    let resource = ResourceRepository::new(state.pool.clone())
        .create(request.name.trim(), request.quantity, request.space_id)
        .await?;

    info!(
        resource_id = resource.id,
        space_id = ?resource.space_id,
        user_id = %staff.actor.user_id,
        "Resource created"
    );
    Ok((StatusCode::CREATED, Json(resource.into())))
}

/// PUT /api/v1/admin/resources/:resource_id
///
/// `"space_id": null` detaches the resource; omitting the field keeps it.
pub async fn update_resource(
    State(state): State<AppState>,
    staff: StaffAuth,
    Path(resource_id): Path<i64>,
    Json(request): Json<UpdateResourceRequest>,
) -> Result<Json<Resource>, ApiError> {
    request.validate()?;

    let resource = ResourceRepository::new(state.pool.clone())
        .update(
            resource_id,
            request.name.as_deref().map(str::trim),
            request.quantity,
            request.space_id,
        )
        .await?
        .ok_or_else(|| not_found(resource_id))?;

    info!(resource_id, user_id = %staff.actor.user_id, "Resource updated");
    Ok(Json(resource.into()))
}

/// DELETE /api/v1/admin/resources/:resource_id
pub async fn delete_resource(
    State(state): State<AppState>,
    staff: StaffAuth,
    Path(resource_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !ResourceRepository::new(state.pool.clone())
        .delete(resource_id)
        .await?
    {
        return Err(not_found(resource_id));
    }

    info!(resource_id, user_id = %staff.actor.user_id, "Resource deleted");
    Ok(StatusCode::NO_CONTENT)
}
