//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str = "id, email, password_hash, display_name, is_active, is_staff, \
                            created_at, updated_at, last_login_at";

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email address, ignoring case.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Creates an account together with its default profile.
    pub async fn create_with_profile(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<&str>,
        is_staff: bool,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user_with_profile");
        let result = async {
            let mut tx = self.pool.begin().await?;

            let user = sqlx::query_as::<_, UserEntity>(&format!(
                r#"
                INSERT INTO users (email, password_hash, display_name, is_active, is_staff)
                VALUES ($1, $2, $3, TRUE, $4)
                RETURNING {USER_COLUMNS}
                "#
            ))
            .bind(email)
            .bind(password_hash)
            .bind(display_name)
            .bind(is_staff)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO profiles (user_id) VALUES ($1)")
                .bind(user.id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(user)
        }
        .await;
        timer.record();
        result
    }

    /// Update user's last login timestamp.
    pub async fn update_last_login(
        &self,
        user_id: Uuid,
        last_login_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("update_user_last_login");
        sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(last_login_at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Grants or revokes the staff flag.
    pub async fn set_staff(&self, user_id: Uuid, is_staff: bool) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("set_user_staff");
        let result = sqlx::query("UPDATE users SET is_staff = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(is_staff)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    pub async fn staff_exists(&self) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("staff_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE is_staff AND is_active)",
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
