//! Profile entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub user_id: Uuid,
    pub phone: String,
    pub receive_emails: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileEntity> for domain::models::Profile {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            user_id: entity.user_id,
            phone: entity.phone,
            receive_emails: entity.receive_emails,
            updated_at: entity.updated_at,
        }
    }
}
