//! Registration, login and token refresh.

use chrono::Utc;
use domain::models::user::{AuthResponse, TokenPair, UserInfo};
use domain::models::User;
use persistence::repositories::UserRepository;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{check_password_strength, hash_password, verify_password, PasswordError};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User is disabled")]
    UserDisabled,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => {
                ApiError::Conflict("Email already registered".to_string())
            }
            AuthError::WeakPassword(msg) => ApiError::field("password", msg),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::UserDisabled => ApiError::Forbidden("Account is disabled".to_string()),
            AuthError::InvalidRefreshToken => {
                ApiError::Unauthorized("Invalid or expired refresh token".to_string())
            }
            AuthError::DatabaseError(e) => ApiError::from(e),
            AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
            AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
        }
    }
}

pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Creates a non-staff account with its default profile.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<AuthResponse, AuthError> {
        check_password_strength(password).map_err(AuthError::WeakPassword)?;

        let email = normalize_email(email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(password)?;
        let display_name = display_name.map(str::trim).filter(|n| !n.is_empty());

        let user = match self
            .users
            .create_with_profile(&email, &password_hash, display_name, false)
            .await
        {
            Ok(user) => user,
            // Lost a race with a concurrent registration for the same email.
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                return Err(AuthError::EmailAlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = %user.id, "User registered");
        self.respond(user.into())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let user: User = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?
            .into();

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        self.users.update_last_login(user.id, Utc::now()).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        self.respond(user)
    }

    /// Exchanges a refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        let user_id: Uuid = self
            .jwt
            .validate_refresh_token(refresh_token)
            .and_then(|claims| claims.user_id())
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user: User = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?
            .into();

        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        self.respond(user)
    }

    fn respond(&self, user: User) -> Result<AuthResponse, AuthError> {
        let access = self.jwt.issue_access_token(user.id)?;
        let refresh = self.jwt.issue_refresh_token(user.id)?;

        Ok(AuthResponse {
            user: UserInfo::from(&user),
            tokens: TokenPair {
                access_token: access.token,
                refresh_token: refresh.token,
                token_type: "Bearer",
                expires_in: access.expires_in,
            },
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn test_auth_error_status_mapping() {
        let status = |e: AuthError| ApiError::from(e).into_response().status();
        assert_eq!(status(AuthError::EmailAlreadyExists), StatusCode::CONFLICT);
        assert_eq!(
            status(AuthError::WeakPassword("too short".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::UserDisabled), StatusCode::FORBIDDEN);
        assert_eq!(status(AuthError::InvalidRefreshToken), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(AuthError::TokenError(JwtError::InvalidToken)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_weak_password_names_field() {
        match ApiError::from(AuthError::WeakPassword("needs a digit".into())) {
            ApiError::InvalidFields(_, details) => assert_eq!(details[0].field, "password"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
