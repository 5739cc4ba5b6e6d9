//! Input validation and normalization
//!
//! Length limits mirror the UI; normalization exists so duplicate
//! detection compares what a human would call "the same" name or phone.

use shared::error::{AppError, AppResult};
use validator::ValidateEmail;

pub const MAX_NAME_LEN: usize = 120;
pub const MAX_USERNAME_LEN: usize = 64;
pub const MAX_TEXT_LEN: usize = 500;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Non-empty after trim, within `max` chars. Returns the trimmed value.
pub fn validate_required_text(value: &str, field: &str, max: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::required_field(field));
    }
    if trimmed.chars().count() > max {
        return Err(
            AppError::validation(format!("{field} exceeds {max} characters"))
                .with_detail("field", field),
        );
    }
    Ok(trimmed.to_string())
}

/// Like [`validate_required_text`] but `None`/blank collapses to `None`.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max: usize,
) -> AppResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            if trimmed.chars().count() > max {
                return Err(
                    AppError::validation(format!("{field} exceeds {max} characters"))
                        .with_detail("field", field),
                );
            }
            Ok(Some(trimmed.to_string()))
        }
    }
}

pub fn validate_email_format(value: Option<&str>) -> AppResult<Option<String>> {
    match validate_optional_text(value, "email", MAX_TEXT_LEN)? {
        None => Ok(None),
        Some(email) => {
            if !email.validate_email() {
                return Err(AppError::validation("invalid email address")
                    .with_detail("field", "email"));
            }
            Ok(Some(email))
        }
    }
}

pub fn validate_password(value: &str) -> AppResult<()> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Lowercase, whitespace-collapsed form for duplicate comparison.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Digits only; formatting and country-code punctuation ignored.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(
            validate_required_text("  Anna  ", "name", MAX_NAME_LEN).unwrap(),
            "Anna"
        );
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(200), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text_collapses_blank() {
        assert_eq!(
            validate_optional_text(Some("  "), "note", MAX_TEXT_LEN).unwrap(),
            None
        );
        assert_eq!(
            validate_optional_text(None, "note", MAX_TEXT_LEN).unwrap(),
            None
        );
        assert_eq!(
            validate_optional_text(Some(" hi "), "note", MAX_TEXT_LEN).unwrap(),
            Some("hi".to_string())
        );
    }

    #[test]
    fn test_email_format() {
        assert_eq!(
            validate_email_format(Some("a@example.com")).unwrap(),
            Some("a@example.com".to_string())
        );
        assert!(validate_email_format(Some("not-an-email")).is_err());
        assert_eq!(validate_email_format(None).unwrap(), None);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Anna   LEE "), "anna lee");
        assert_eq!(normalize_name("anna lee"), "anna lee");
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+1 (555) 010-1234"), "15550101234");
        assert_eq!(normalize_phone("555.0101"), "5550101");
    }
}
