//! Field validators shared by request types.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Digits, spaces, dashes, dots, parentheses and an optional leading `+`.
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9 ()\-.]{6,30}$").unwrap();
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Rejects names that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value cannot be blank"))
    } else {
        Ok(())
    }
}

/// Accepts an empty phone (not provided) or a plausible phone number.
/// Surrounding whitespace is ignored.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || PHONE_RE.is_match(value) {
        Ok(())
    } else {
        Err(error("phone_format", "Phone number format is invalid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Room A").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_not_blank_message() {
        let err = validate_not_blank(" ").unwrap_err();
        assert_eq!(err.message.unwrap().to_string(), "Value cannot be blank");
    }

    #[test]
    fn test_phone_accepts_common_formats() {
        assert!(validate_phone("").is_ok());
        assert!(validate_phone("+56 9 1234 5678").is_ok());
        assert!(validate_phone("(02) 2345-6789").is_ok());
        assert!(validate_phone(" +421 900 123 456 ").is_ok());
    }

    #[test]
    fn test_phone_rejects_letters() {
        assert!(validate_phone("call me maybe").is_err());
        assert!(validate_phone("12").is_err());
    }
}
