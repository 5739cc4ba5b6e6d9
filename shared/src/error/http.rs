//! HTTP rendering of errors
//!
//! Maps error codes to status codes and defines the wire envelope.
//! Successful handlers return their payload as plain JSON; only
//! failures travel inside [`ApiResponse`].

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use super::types::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

impl ErrorCode {
    /// HTTP status for the code.
    pub const fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::Success => StatusCode::OK,

            // Malformed input
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidRequest
            | ErrorCode::InvalidFormat
            | ErrorCode::RequiredField
            | ErrorCode::ValueOutOfRange => StatusCode::BAD_REQUEST,

            // Missing things
            ErrorCode::NotFound
            | ErrorCode::BranchNotFound
            | ErrorCode::StudentNotFound
            | ErrorCode::FeeNotFound
            | ErrorCode::PaymentNotFound
            | ErrorCode::AttendanceNotFound
            | ErrorCode::TrainerNotFound
            | ErrorCode::StaffNotFound => StatusCode::NOT_FOUND,

            // Uniqueness clashes
            ErrorCode::AlreadyExists
            | ErrorCode::BranchNameExists
            | ErrorCode::DuplicateStudent
            | ErrorCode::StudentUsernameExists
            | ErrorCode::StaffUsernameExists => StatusCode::CONFLICT,

            // Identity problems
            ErrorCode::NotAuthenticated
            | ErrorCode::InvalidCredentials
            | ErrorCode::TokenExpired
            | ErrorCode::TokenInvalid
            | ErrorCode::SessionExpired
            | ErrorCode::IdentityMismatch => StatusCode::UNAUTHORIZED,

            // Known identity, insufficient rights
            ErrorCode::AccountLocked
            | ErrorCode::AccountDisabled
            | ErrorCode::PermissionDenied
            | ErrorCode::RoleRequired
            | ErrorCode::AdminRequired
            | ErrorCode::BranchForbidden
            | ErrorCode::BranchDisabled => StatusCode::FORBIDDEN,

            // Well-formed request, business rule says no
            ErrorCode::BranchHasStudents
            | ErrorCode::StudentInactive
            | ErrorCode::PaymentExceedsBalance
            | ErrorCode::FeeAlreadyPaid
            | ErrorCode::PaymentInvalidAmount
            | ErrorCode::AttendanceDateInFuture
            | ErrorCode::AttendanceInvalidStatus
            | ErrorCode::TrainerInactive
            | ErrorCode::StaffCannotDeleteSelf
            | ErrorCode::StaffBranchRequired => StatusCode::UNPROCESSABLE_ENTITY,

            ErrorCode::NetworkError => StatusCode::BAD_GATEWAY,
            ErrorCode::TimeoutError => StatusCode::GATEWAY_TIMEOUT,

            ErrorCode::Unknown
            | ErrorCode::InternalError
            | ErrorCode::DatabaseError
            | ErrorCode::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Wire envelope for errors (and, on the client, for decoding them).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: ErrorCode::Success.code(),
            message: ErrorCode::Success.message().to_string(),
            data: Some(data),
            details: None,
        }
    }

    pub fn ok() -> Self {
        Self {
            code: ErrorCode::Success.code(),
            message: ErrorCode::Success.message().to_string(),
            data: None,
            details: None,
        }
    }

    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success.code()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = ErrorCode::try_from(self.code)
            .map(|c| c.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server faults get a log line with the full error; client
        // faults are the caller's problem and stay quiet here.
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = self.code.code(), "server error: {}", self.message);
        }
        let status = self.code.http_status();
        (status, Json(ApiResponse::<Value>::error(&self))).into_response()
    }
}
