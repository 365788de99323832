//! JWT bearer authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::jwt::JwtConfig;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Identity proven by a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub jti: String,
}

impl AuthenticatedUser {
    /// Validates the `Authorization: Bearer <token>` header.
    pub fn from_headers(headers: &HeaderMap, jwt: &JwtConfig) -> Result<Self, ApiError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                ApiError::Unauthorized("Invalid Authorization header format".to_string())
            })?;

        let claims = jwt.validate_access_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })?;

        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(Self {
            user_id,
            jti: claims.jti,
        })
    }
}

/// Rejects requests without a valid access token and stores the caller in
/// the request extensions for the extractors and the rate limiter.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match AuthenticatedUser::from_headers(req.headers(), &state.jwt) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn jwt() -> JwtConfig {
        JwtConfig::from_secret("auth-middleware-test-secret", 3600)
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_valid_access_token() {
        let jwt = jwt();
        let user_id = Uuid::new_v4();
        let issued = jwt.issue_access_token(user_id).unwrap();

        let user =
            AuthenticatedUser::from_headers(&headers(&format!("Bearer {}", issued.token)), &jwt)
                .unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.jti, issued.jti);
    }

    #[test]
    fn test_missing_header() {
        let err = AuthenticatedUser::from_headers(&HeaderMap::new(), &jwt()).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(m) if m.contains("Missing")));
    }

    #[test]
    fn test_wrong_scheme() {
        let err = AuthenticatedUser::from_headers(&headers("Basic abc"), &jwt()).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(m) if m.contains("format")));
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let jwt = jwt();
        let refresh = jwt.issue_refresh_token(Uuid::new_v4()).unwrap();
        let result =
            AuthenticatedUser::from_headers(&headers(&format!("Bearer {}", refresh.token)), &jwt);
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_token_from_other_key_is_rejected() {
        let other = JwtConfig::from_secret("some-other-secret", 3600);
        let issued = other.issue_access_token(Uuid::new_v4()).unwrap();
        let result =
            AuthenticatedUser::from_headers(&headers(&format!("Bearer {}", issued.token)), &jwt());
        assert!(result.is_err());
    }
}
