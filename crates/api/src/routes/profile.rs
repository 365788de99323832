//! Profile of the signed-in user.

use axum::{extract::State, Json};
use domain::models::profile::UpdateProfileRequest;
use domain::models::Profile;
use persistence::repositories::ProfileRepository;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// GET /api/v1/profile
///
/// Created with defaults on first access.
pub async fn get_profile(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<Profile>, ApiError> {
    let profile = ProfileRepository::new(state.pool.clone())
        .get_or_create(user.user_id)
        .await?;
    Ok(Json(profile.into()))
}

/// PUT /api/v1/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: UserAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    request.validate()?;

    let profile = ProfileRepository::new(state.pool.clone())
        .update(
            user.user_id,
            request.phone.as_deref().map(str::trim),
            request.receive_emails,
        )
        .await?;

    tracing::info!(user_id = %user.user_id, "Profile updated");
    Ok(Json(profile.into()))
}
