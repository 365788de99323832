//! Space repository for database operations.

use sqlx::PgPool;

use crate::entities::SpaceEntity;
use crate::metrics::QueryTimer;

/// Repository for space-related database operations.
#[derive(Clone)]
pub struct SpaceRepository {
    pool: PgPool,
}

impl SpaceRepository {
    /// Creates a new SpaceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        location: &str,
        capacity: i32,
        is_active: bool,
    ) -> Result<SpaceEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_space");
        let result = sqlx::query_as::<_, SpaceEntity>(
            r#"
            INSERT INTO spaces (name, location, capacity, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, location, capacity, is_active, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(location)
        .bind(capacity)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<SpaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_space_by_id");
        let result = sqlx::query_as::<_, SpaceEntity>(
            r#"
            SELECT id, name, location, capacity, is_active, created_at, updated_at
            FROM spaces
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List spaces by name, optionally only active or inactive ones.
    pub async fn list(&self, active: Option<bool>) -> Result<Vec<SpaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_spaces");
        let result = sqlx::query_as::<_, SpaceEntity>(
            r#"
            SELECT id, name, location, capacity, is_active, created_at, updated_at
            FROM spaces
            WHERE ($1::BOOLEAN IS NULL OR is_active = $1)
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(active)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Partial update. Returns None when the space does not exist.
    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        location: Option<&str>,
        capacity: Option<i32>,
        is_active: Option<bool>,
    ) -> Result<Option<SpaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_space");
        let result = sqlx::query_as::<_, SpaceEntity>(
            r#"
            UPDATE spaces
            SET name = COALESCE($2, name),
                location = COALESCE($3, location),
                capacity = COALESCE($4, capacity),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, location, capacity, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(location)
        .bind(capacity)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Deletes a space and, by cascade, its reservations. Returns false if absent.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_space");
        let result = sqlx::query("DELETE FROM spaces WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
