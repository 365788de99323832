//! Profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProfileEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the user's profile, creating it with defaults on first access.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("get_or_create_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            INSERT INTO profiles (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING user_id, phone, receive_emails, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Updates the given fields, creating the profile if needed.
    pub async fn update(
        &self,
        user_id: Uuid,
        phone: Option<&str>,
        receive_emails: Option<bool>,
    ) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            INSERT INTO profiles (user_id, phone, receive_emails)
            VALUES ($1, COALESCE($2, ''), COALESCE($3, TRUE))
            ON CONFLICT (user_id) DO UPDATE
            SET phone = COALESCE($2, profiles.phone),
                receive_emails = COALESCE($3, profiles.receive_emails),
                updated_at = NOW()
            RETURNING user_id, phone, receive_emails, updated_at
            "#,
        )
        .bind(user_id)
        .bind(phone)
        .bind(receive_emails)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
