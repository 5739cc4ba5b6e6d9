//! Staff account endpoints, admin-only as a whole.

pub mod handler;

use crate::auth::require_admin;
use crate::core::ServerState;
use axum::routing::{get, put};
use axum::{middleware, Router};

pub fn router() -> Router<ServerState> {
    let routes = Router::new()
        .route("/", get(handler::list_staff).post(handler::create_staff))
        .route(
            "/{id}",
            put(handler::update_staff).delete(handler::delete_staff),
        )
        .layer(middleware::from_fn(require_admin));

    Router::new().nest("/api/staff", routes)
}
