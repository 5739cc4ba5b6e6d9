//! Branch endpoints
//!
//! Reads need `branches.read`; every mutation is admin-only.

pub mod handler;

use crate::auth::{require_admin, require_permission};
use crate::core::ServerState;
use axum::routing::{get, post, put};
use axum::{middleware, Router};

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list_branches))
        .route("/{id}", get(handler::get_branch))
        .layer(middleware::from_fn(require_permission("branches.read")));

    let manage_routes = Router::new()
        .route("/", post(handler::create_branch))
        .route(
            "/{id}",
            put(handler::update_branch).delete(handler::delete_branch),
        )
        .layer(middleware::from_fn(require_admin));

    Router::new().nest("/api/branches", read_routes.merge(manage_routes))
}
