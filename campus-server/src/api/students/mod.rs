//! Student endpoints

pub mod handler;

use crate::auth::require_permission;
use crate::core::ServerState;
use axum::routing::{get, post, put};
use axum::{middleware, Router};

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list_students))
        .route("/{id}", get(handler::get_student))
        .layer(middleware::from_fn(require_permission("students.read")));

    let manage_routes = Router::new()
        .route("/", post(handler::create_student))
        .route(
            "/{id}",
            put(handler::update_student).delete(handler::delete_student),
        )
        .layer(middleware::from_fn(require_permission("students.write")));

    Router::new().nest("/api/students", read_routes.merge(manage_routes))
}
