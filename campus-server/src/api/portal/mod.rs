//! Student portal endpoints
//!
//! Everything under `/api/student` requires a student token; staff
//! tokens are rejected outright. Handlers derive the student id from
//! the token, never from the request.

pub mod handler;

use crate::auth::require_student;
use crate::core::ServerState;
use axum::routing::get;
use axum::{middleware, Router};

pub fn router() -> Router<ServerState> {
    let routes = Router::new()
        .route("/profile", get(handler::profile))
        .route("/attendance", get(handler::attendance))
        .route("/fees", get(handler::fees))
        .layer(middleware::from_fn(require_student));

    Router::new().nest("/api/student", routes)
}
