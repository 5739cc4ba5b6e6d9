//! Domain models shared across the workspace
//!
//! Entities derive `sqlx::FromRow` only when the `db` feature is on, so
//! client builds stay free of the database stack.

pub mod attendance;
pub mod branch;
pub mod fee;
pub mod staff;
pub mod student;
pub mod trainer;

pub use attendance::{
    AttendanceQuery, AttendanceRecord, AttendanceStatus, AttendanceWithStudent,
    MarkAttendanceRequest,
};
pub use branch::{Branch, BranchCreate, BranchUpdate};
pub use fee::{Fee, FeeCreate, FeeStatus, FeeWithStudent, Payment, PaymentCreate, StudentStatement};
pub use staff::{StaffCreate, StaffMember, StaffUpdate};
pub use student::{Student, StudentCreate, StudentQuery, StudentUpdate};
pub use trainer::{Trainer, TrainerCreate, TrainerUpdate};
