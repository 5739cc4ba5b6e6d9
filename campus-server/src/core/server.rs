//! HTTP server lifecycle

use crate::api;
use crate::auth::middleware::require_auth;
use crate::core::ServerState;
use axum::middleware;
use axum::Router;
use axum_server::Handle;
use std::net::SocketAddr;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub struct Server {
    state: ServerState,
}

impl Server {
    pub fn with_state(state: ServerState) -> Self {
        Self { state }
    }

    /// Full application router with middleware attached.
    ///
    /// Auth runs after CORS/trace (so preflights and logging see every
    /// request) but before any handler.
    pub fn build_router(state: ServerState) -> Router {
        api::router()
            .layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .layer(TimeoutLayer::new(Duration::from_secs(30))),
            )
            .with_state(state)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let app = Self::build_router(self.state);

        let handle = Handle::new();
        tokio::spawn(shutdown_signal(handle.clone()));

        tracing::info!(%addr, "listening");
        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;
        tracing::info!("server stopped");
        Ok(())
    }
}

async fn shutdown_signal(handle: Handle<SocketAddr>) {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install ctrl-c handler");
        return;
    }
    tracing::info!("shutdown signal received");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
