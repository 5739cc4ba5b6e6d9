//! Attendance endpoints

pub mod handler;

use crate::auth::require_permission;
use crate::core::ServerState;
use axum::routing::{get, post};
use axum::{middleware, Router};

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list_attendance))
        .layer(middleware::from_fn(require_permission("attendance.read")));

    let manage_routes = Router::new()
        .route("/", post(handler::mark_attendance))
        .layer(middleware::from_fn(require_permission("attendance.write")));

    Router::new().nest("/api/attendance", read_routes.merge(manage_routes))
}
