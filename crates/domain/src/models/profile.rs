//! User profile (contact and preference data).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    pub user_id: Uuid,
    pub phone: String,
    pub receive_emails: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    #[validate(
        length(max = 30, message = "Phone must be at most 30 characters"),
        custom(function = "shared::validation::validate_phone")
    )]
    pub phone: Option<String>,
    pub receive_emails: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_validates_phone() {
        let ok: UpdateProfileRequest =
            serde_json::from_str(r#"{"phone":"+56 9 8765 4321"}"#).unwrap();
        assert!(ok.validate().is_ok());

        let bad: UpdateProfileRequest = serde_json::from_str(r#"{"phone":"ring ring"}"#).unwrap();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_update_profile_empty_phone_clears_it() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"phone":""}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}
