//! Fee and payment endpoints

pub mod handler;

use crate::auth::require_permission;
use crate::core::ServerState;
use axum::routing::{get, post};
use axum::{middleware, Router};

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list_fees))
        .route("/{id}", get(handler::get_fee))
        .route("/{id}/payments", get(handler::list_payments))
        .layer(middleware::from_fn(require_permission("fees.read")));

    let manage_routes = Router::new()
        .route("/", post(handler::create_fee))
        .route("/{id}/payments", post(handler::record_payment))
        .layer(middleware::from_fn(require_permission("fees.write")));

    Router::new().nest("/api/fees", read_routes.merge(manage_routes))
}
