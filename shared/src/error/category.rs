//! Error categories
//!
//! Coarse grouping derived from the code ranges, used for logging and
//! for client-side branching that does not care about the exact code.

use super::codes::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Branch,
    Student,
    Fee,
    Attendance,
    Trainer,
    Staff,
    System,
}

impl ErrorCategory {
    /// Category from the thousand-block of the numeric code.
    pub const fn from_code(code: ErrorCode) -> Self {
        let value = code.code();
        match value {
            0..=999 => ErrorCategory::General,
            1000..=1999 => ErrorCategory::Auth,
            2000..=2999 => ErrorCategory::Permission,
            3000..=3999 => ErrorCategory::Branch,
            4000..=4999 => ErrorCategory::Student,
            5000..=5999 => ErrorCategory::Fee,
            6000..=6999 => ErrorCategory::Attendance,
            7000..=7999 => ErrorCategory::Trainer,
            8000..=8999 => ErrorCategory::Staff,
            _ => ErrorCategory::System,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ErrorCategory::General => "general",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Permission => "permission",
            ErrorCategory::Branch => "branch",
            ErrorCategory::Student => "student",
            ErrorCategory::Fee => "fee",
            ErrorCategory::Attendance => "attendance",
            ErrorCategory::Trainer => "trainer",
            ErrorCategory::Staff => "staff",
            ErrorCategory::System => "system",
        }
    }

    /// Categories whose errors warrant a security log entry.
    pub const fn is_security_relevant(&self) -> bool {
        matches!(self, ErrorCategory::Auth | ErrorCategory::Permission)
    }
}

impl ErrorCode {
    pub const fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_follow_code_ranges() {
        assert_eq!(ErrorCode::ValidationFailed.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenExpired.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::BranchForbidden.category(), ErrorCategory::Permission);
        assert_eq!(ErrorCode::BranchNotFound.category(), ErrorCategory::Branch);
        assert_eq!(ErrorCode::DuplicateStudent.category(), ErrorCategory::Student);
        assert_eq!(ErrorCode::PaymentExceedsBalance.category(), ErrorCategory::Fee);
        assert_eq!(
            ErrorCode::AttendanceDateInFuture.category(),
            ErrorCategory::Attendance
        );
        assert_eq!(ErrorCode::TrainerNotFound.category(), ErrorCategory::Trainer);
        assert_eq!(ErrorCode::StaffUsernameExists.category(), ErrorCategory::Staff);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_security_relevant_categories() {
        assert!(ErrorCode::InvalidCredentials.category().is_security_relevant());
        assert!(ErrorCode::PermissionDenied.category().is_security_relevant());
        assert!(!ErrorCode::StudentNotFound.category().is_security_relevant());
    }
}
