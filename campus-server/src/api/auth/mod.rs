//! Authentication endpoints

pub mod handler;

use crate::core::ServerState;
use axum::routing::{get, post};
use axum::Router;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/student/login", post(handler::student_login))
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/logout", post(handler::logout))
}
