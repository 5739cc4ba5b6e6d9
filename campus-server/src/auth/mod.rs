//! Authentication and authorization

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentActor, CurrentStudent, JwtService};
pub use middleware::{
    require_admin, require_auth, require_permission, require_staff, require_student,
};
