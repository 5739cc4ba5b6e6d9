//! Dashboard and reporting endpoints
//!
//! The dashboard serves every staff role (scoped to their branch); the
//! per-branch breakdown is the admin's cross-branch view.

pub mod handler;

use crate::auth::{require_admin, require_staff};
use crate::core::ServerState;
use axum::routing::get;
use axum::{middleware, Router};

pub fn router() -> Router<ServerState> {
    let staff_routes = Router::new()
        .route("/dashboard", get(handler::dashboard))
        .layer(middleware::from_fn(require_staff));

    let admin_routes = Router::new()
        .route("/branches", get(handler::branch_breakdown))
        .layer(middleware::from_fn(require_admin));

    Router::new().nest("/api/reports", staff_routes.merge(admin_routes))
}
