//! Unified error handling
//!
//! - [`codes`]: stable numeric error codes, grouped by domain
//! - [`types`]: the [`AppError`] carrier and its constructors
//! - [`category`]: coarse grouping derived from code ranges
//! - [`http`]: status mapping and the wire envelope

pub mod category;
pub mod codes;
pub mod http;
pub mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use http::ApiResponse;
pub use types::{AppError, AppResult};
