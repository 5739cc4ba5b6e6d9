//! Core error type
//!
//! [`AppError`] is the single error currency of the workspace: handlers
//! return it, the HTTP layer renders it, and the client reconstructs it
//! from the wire envelope.

use super::codes::ErrorCode;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error: a stable code, a human message, optional details.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// New error with the code's default message.
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.message().to_string(),
            details: None,
        }
    }

    /// New error with a custom message.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach a single detail entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach a full detail map.
    pub fn with_details(mut self, details: HashMap<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    // ===== General =====

    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, message)
    }

    pub fn required_field(field: &str) -> Self {
        Self::with_message(ErrorCode::RequiredField, format!("{field} is required"))
            .with_detail("field", field)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::with_message(ErrorCode::NotFound, format!("{resource} not found"))
            .with_detail("resource", resource)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, message)
    }

    // ===== Authentication =====

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn invalid_token() -> Self {
        Self::new(ErrorCode::TokenInvalid)
    }

    pub fn account_disabled() -> Self {
        Self::new(ErrorCode::AccountDisabled)
    }

    pub fn identity_mismatch() -> Self {
        Self::new(ErrorCode::IdentityMismatch)
    }

    // ===== Permission / scope =====

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, message)
    }

    pub fn permission_denied(permission: &str) -> Self {
        Self::new(ErrorCode::PermissionDenied).with_detail("permission", permission)
    }

    pub fn admin_required() -> Self {
        Self::new(ErrorCode::AdminRequired)
    }

    pub fn branch_forbidden() -> Self {
        Self::new(ErrorCode::BranchForbidden)
    }

    // ===== Domain =====

    pub fn duplicate_student() -> Self {
        Self::new(ErrorCode::DuplicateStudent)
    }

    pub fn payment_exceeds_balance(outstanding_cents: i64) -> Self {
        Self::new(ErrorCode::PaymentExceedsBalance).with_detail("outstanding", outstanding_cents)
    }

    pub fn business_rule(code: ErrorCode) -> Self {
        Self::new(code)
    }

    // ===== System =====

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, message)
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_message(ErrorCode::InvalidFormat, err.to_string())
    }
}

#[cfg(feature = "db")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::new(ErrorCode::NotFound),
            _ => {
                if err
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation())
                {
                    return Self::new(ErrorCode::AlreadyExists);
                }
                Self::database(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::StudentNotFound);
        assert_eq!(err.code, ErrorCode::StudentNotFound);
        assert_eq!(err.message, "Student not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_with_detail_accumulates() {
        let err = AppError::validation("bad input")
            .with_detail("field", "name")
            .with_detail("max", 120);
        let details = err.details.unwrap();
        assert_eq!(details.get("field"), Some(&Value::from("name")));
        assert_eq!(details.get("max"), Some(&Value::from(120)));
    }

    #[test]
    fn test_not_found_carries_resource_detail() {
        let err = AppError::not_found("branch");
        assert_eq!(err.message, "branch not found");
        assert_eq!(
            err.details.unwrap().get("resource"),
            Some(&Value::from("branch"))
        );
    }

    #[test]
    fn test_payment_error_carries_outstanding_balance() {
        let err = AppError::payment_exceeds_balance(2500);
        assert_eq!(err.code, ErrorCode::PaymentExceedsBalance);
        assert_eq!(
            err.details.unwrap().get("outstanding"),
            Some(&Value::from(2500))
        );
    }

    #[test]
    fn test_display_is_the_message() {
        let err = AppError::forbidden("no fees access");
        assert_eq!(err.to_string(), "no fees access");
    }
}
