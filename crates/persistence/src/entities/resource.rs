//! Resource entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ResourceEntity {
    pub id: i64,
    pub name: String,
    pub quantity: i32,
    pub space_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResourceEntity> for domain::models::Resource {
    fn from(entity: ResourceEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            quantity: entity.quantity,
            space_id: entity.space_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
