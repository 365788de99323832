//! Resource repository for database operations.

use sqlx::PgPool;

use crate::entities::ResourceEntity;
use crate::metrics::QueryTimer;

/// Repository for resource-related database operations.
#[derive(Clone)]
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    /// Creates a new ResourceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        quantity: i32,
        space_id: Option<i64>,
    ) -> Result<ResourceEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_resource");
        let result = sqlx::query_as::<_, ResourceEntity>(
            r#"
            INSERT INTO resources (name, quantity, space_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, quantity, space_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(quantity)
        .bind(space_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ResourceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_resource_by_id");
        let result = sqlx::query_as::<_, ResourceEntity>(
            r#"
            SELECT id, name, quantity, space_id, created_at, updated_at
            FROM resources
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(&self, space_id: Option<i64>) -> Result<Vec<ResourceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_resources");
        let result = sqlx::query_as::<_, ResourceEntity>(
            r#"
            SELECT id, name, quantity, space_id, created_at, updated_at
            FROM resources
            WHERE ($1::BIGINT IS NULL OR space_id = $1)
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(space_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Partial update. `space_id: Some(None)` detaches the resource.
    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        quantity: Option<i32>,
        space_id: Option<Option<i64>>,
    ) -> Result<Option<ResourceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_resource");
        let result = sqlx::query_as::<_, ResourceEntity>(
            r#"
            UPDATE resources
            SET name = COALESCE($2, name),
                quantity = COALESCE($3, quantity),
                space_id = CASE WHEN $4 THEN $5 ELSE space_id END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, quantity, space_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(quantity)
        .bind(space_id.is_some())
        .bind(space_id.flatten())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_resource");
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
