//! Trainer endpoints

pub mod handler;

use crate::auth::require_permission;
use crate::core::ServerState;
use axum::routing::{get, post, put};
use axum::{middleware, Router};

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list_trainers))
        .route("/{id}", get(handler::get_trainer))
        .layer(middleware::from_fn(require_permission("trainers.read")));

    let manage_routes = Router::new()
        .route("/", post(handler::create_trainer))
        .route(
            "/{id}",
            put(handler::update_trainer).delete(handler::delete_trainer),
        )
        .layer(middleware::from_fn(require_permission("trainers.write")));

    Router::new().nest("/api/trainers", read_routes.merge(manage_routes))
}
