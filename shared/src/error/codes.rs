//! Error code definitions
//!
//! Numeric codes carried in every error envelope. Codes are grouped by
//! domain in thousand-blocks so clients can branch on a range without
//! knowing every code:
//!
//! - 0xxx: general / validation
//! - 1xxx: authentication
//! - 2xxx: permission / scope
//! - 3xxx: branches
//! - 4xxx: students
//! - 5xxx: fees and payments
//! - 6xxx: attendance
//! - 7xxx: trainers
//! - 8xxx: staff accounts
//! - 9xxx: system

use serde::{Deserialize, Serialize};

/// Stable error code for the wire protocol.
///
/// Serialized as the bare number, never the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ===== General (0xxx) =====
    Success = 0,
    Unknown = 1,
    ValidationFailed = 2,
    NotFound = 3,
    AlreadyExists = 4,
    InvalidRequest = 5,
    InvalidFormat = 6,
    RequiredField = 7,
    ValueOutOfRange = 8,

    // ===== Authentication (1xxx) =====
    NotAuthenticated = 1001,
    InvalidCredentials = 1002,
    TokenExpired = 1003,
    TokenInvalid = 1004,
    SessionExpired = 1005,
    AccountLocked = 1006,
    AccountDisabled = 1007,
    /// Identity headers disagree with the verified token.
    IdentityMismatch = 1008,

    // ===== Permission (2xxx) =====
    PermissionDenied = 2001,
    RoleRequired = 2002,
    AdminRequired = 2003,
    /// Data belongs to a branch outside the actor's scope.
    BranchForbidden = 2006,

    // ===== Branches (3xxx) =====
    BranchNotFound = 3001,
    BranchNameExists = 3002,
    BranchHasStudents = 3003,
    BranchDisabled = 3004,

    // ===== Students (4xxx) =====
    StudentNotFound = 4001,
    DuplicateStudent = 4002,
    StudentInactive = 4003,
    StudentUsernameExists = 4004,

    // ===== Fees / payments (5xxx) =====
    FeeNotFound = 5001,
    PaymentExceedsBalance = 5002,
    FeeAlreadyPaid = 5003,
    PaymentInvalidAmount = 5004,
    PaymentNotFound = 5005,

    // ===== Attendance (6xxx) =====
    AttendanceNotFound = 6001,
    AttendanceDateInFuture = 6002,
    AttendanceInvalidStatus = 6003,

    // ===== Trainers (7xxx) =====
    TrainerNotFound = 7001,
    TrainerInactive = 7002,

    // ===== Staff accounts (8xxx) =====
    StaffNotFound = 8001,
    StaffUsernameExists = 8002,
    StaffCannotDeleteSelf = 8003,
    StaffBranchRequired = 8004,

    // ===== System (9xxx) =====
    InternalError = 9001,
    DatabaseError = 9002,
    NetworkError = 9003,
    TimeoutError = 9004,
    ConfigError = 9005,
}

impl ErrorCode {
    /// Default English message for the code.
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",

            // Authentication
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Invalid token",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::AccountLocked => "Account is locked",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::IdentityMismatch => "Identity does not match token",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Required role missing",
            ErrorCode::AdminRequired => "Administrator access required",
            ErrorCode::BranchForbidden => "Data belongs to another branch",

            // Branches
            ErrorCode::BranchNotFound => "Branch not found",
            ErrorCode::BranchNameExists => "Branch name already exists",
            ErrorCode::BranchHasStudents => "Branch still has active students",
            ErrorCode::BranchDisabled => "Branch is disabled",

            // Students
            ErrorCode::StudentNotFound => "Student not found",
            ErrorCode::DuplicateStudent => "A matching student already exists",
            ErrorCode::StudentInactive => "Student is inactive",
            ErrorCode::StudentUsernameExists => "Student username already exists",

            // Fees / payments
            ErrorCode::FeeNotFound => "Fee record not found",
            ErrorCode::PaymentExceedsBalance => "Payment exceeds outstanding balance",
            ErrorCode::FeeAlreadyPaid => "Fee is already fully paid",
            ErrorCode::PaymentInvalidAmount => "Payment amount must be positive",
            ErrorCode::PaymentNotFound => "Payment not found",

            // Attendance
            ErrorCode::AttendanceNotFound => "Attendance record not found",
            ErrorCode::AttendanceDateInFuture => "Attendance date is in the future",
            ErrorCode::AttendanceInvalidStatus => "Invalid attendance status",

            // Trainers
            ErrorCode::TrainerNotFound => "Trainer not found",
            ErrorCode::TrainerInactive => "Trainer is inactive",

            // Staff accounts
            ErrorCode::StaffNotFound => "Staff account not found",
            ErrorCode::StaffUsernameExists => "Staff username already exists",
            ErrorCode::StaffCannotDeleteSelf => "Cannot deactivate your own account",
            ErrorCode::StaffBranchRequired => "Non-admin staff require a branch",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }

    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1006 => Ok(ErrorCode::AccountLocked),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::IdentityMismatch),

            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2006 => Ok(ErrorCode::BranchForbidden),

            3001 => Ok(ErrorCode::BranchNotFound),
            3002 => Ok(ErrorCode::BranchNameExists),
            3003 => Ok(ErrorCode::BranchHasStudents),
            3004 => Ok(ErrorCode::BranchDisabled),

            4001 => Ok(ErrorCode::StudentNotFound),
            4002 => Ok(ErrorCode::DuplicateStudent),
            4003 => Ok(ErrorCode::StudentInactive),
            4004 => Ok(ErrorCode::StudentUsernameExists),

            5001 => Ok(ErrorCode::FeeNotFound),
            5002 => Ok(ErrorCode::PaymentExceedsBalance),
            5003 => Ok(ErrorCode::FeeAlreadyPaid),
            5004 => Ok(ErrorCode::PaymentInvalidAmount),
            5005 => Ok(ErrorCode::PaymentNotFound),

            6001 => Ok(ErrorCode::AttendanceNotFound),
            6002 => Ok(ErrorCode::AttendanceDateInFuture),
            6003 => Ok(ErrorCode::AttendanceInvalidStatus),

            7001 => Ok(ErrorCode::TrainerNotFound),
            7002 => Ok(ErrorCode::TrainerInactive),

            8001 => Ok(ErrorCode::StaffNotFound),
            8002 => Ok(ErrorCode::StaffUsernameExists),
            8003 => Ok(ErrorCode::StaffCannotDeleteSelf),
            8004 => Ok(ErrorCode::StaffBranchRequired),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(format!("unknown error code: {value}")),
        }
    }
}
