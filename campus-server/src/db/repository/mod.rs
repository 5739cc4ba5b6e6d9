//! Repositories
//!
//! One module per aggregate. Every query that touches branch-partitioned
//! data takes a `scope: Option<i64>` and ANDs it into the predicate:
//! `None` (admin) reads everything, `Some(branch)` sees only that
//! branch. Handlers obtain the scope from the authenticated actor, never
//! from request input.

pub mod attendance;
pub mod branch;
pub mod fee;
pub mod report;
pub mod staff;
pub mod student;
pub mod trainer;

pub use attendance::AttendanceRepository;
pub use branch::BranchRepository;
pub use fee::FeeRepository;
pub use report::ReportRepository;
pub use staff::StaffRepository;
pub use student::StudentRepository;
pub use trainer::TrainerRepository;
