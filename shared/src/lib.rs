//! Shared types for the Campus platform
//!
//! Common types used across the server and client crates: the access
//! policy (roles, resources, permissions, branch scoping), domain
//! models, wire DTOs, the unified error system, and small utilities.

pub mod client;
pub mod error;
pub mod models;
pub mod policy;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

// Policy re-exports (used on both sides of the wire)
pub use policy::{Actor, Resource, Role, StaffRole, scope_filter};

// Error re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
