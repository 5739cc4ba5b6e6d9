//! Campus Client - session, guarding, and HTTP plumbing for campus UIs
//!
//! Everything between a UI shell and the campus server lives here:
//! persisted staff/student sessions, role-based route guards, and the
//! authenticated HTTP gateway. Rendering and navigation stay behind
//! small traits so desktop and web shells share one core.
//!
//! The guards are a UX convenience, not the security boundary; the
//! server re-checks every request against the bearer token.

pub mod auth;
pub mod error;
pub mod guard;
pub mod http;
pub mod navigator;
pub mod session;
pub mod storage;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use auth::AuthService;
pub use error::{ClientError, ClientResult};
pub use guard::{GuardState, RouteGuard, StudentGuard};
pub use http::{ApiGateway, AuthContext, HttpGateway};
pub use navigator::Navigator;
pub use session::{
    Identity, Session, SessionError, SessionKind, StaffIdentity, StudentIdentity,
};
pub use storage::{FileKvStore, KvStore, MemoryKvStore};
pub use store::SessionStore;

// Re-export shared types for convenience
pub use shared::client::{
    LoginRequest, LoginResponse, StudentInfo, StudentLoginRequest, StudentLoginResponse, UserInfo,
};
pub use shared::policy::{Role, StaffRole};
