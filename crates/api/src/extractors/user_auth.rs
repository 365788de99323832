//! Authenticated-caller extractors.
//!
//! [`UserAuth`] only proves a valid access token. [`CurrentActor`] and
//! [`StaffAuth`] also load the account, so a deactivated user or a revoked
//! staff flag takes effect on the next request.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::services::{Actor, StaffCapability};
use persistence::repositories::UserRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;

#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: Uuid,
    pub jti: String,
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = match parts.extensions.get::<AuthenticatedUser>() {
            Some(auth) => auth.clone(),
            None => AuthenticatedUser::from_headers(&parts.headers, &state.jwt)?,
        };

        Ok(UserAuth {
            user_id: auth.user_id,
            jti: auth.jti,
        })
    }
}

/// The caller as the booking rules see them.
#[derive(Debug, Clone, Copy)]
pub struct CurrentActor(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = UserAuth::from_request_parts(parts, state).await?;

        let user = UserRepository::new(state.pool.clone())
            .find_by_id(auth.user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| ApiError::Unauthorized("Account not found or disabled".to_string()))?;

        Ok(CurrentActor(Actor::new(user.id, user.is_staff)))
    }
}

/// Rejects non-staff callers with 403 before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct StaffAuth {
    pub actor: Actor,
    pub capability: StaffCapability,
}

#[async_trait]
impl FromRequestParts<AppState> for StaffAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentActor(actor) = CurrentActor::from_request_parts(parts, state).await?;
        let capability = actor.require_staff().map_err(|e| {
            tracing::info!(user_id = %actor.user_id, "Staff-only endpoint refused");
            ApiError::from(e)
        })?;

        Ok(StaffAuth { actor, capability })
    }
}
