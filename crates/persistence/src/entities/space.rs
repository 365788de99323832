//! Space entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct SpaceEntity {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SpaceEntity> for domain::models::Space {
    fn from(entity: SpaceEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            location: entity.location,
            capacity: entity.capacity,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
