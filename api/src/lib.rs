//! HTTP surface of the keyword backend.

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        health::health_route::health_route,
        keyword_embedding::keyword_embedding_route::keyword_embedding_route,
        root::root_route::root_route,
        user_history::{
            append_query_route::append_query_route, recent_window_route::recent_window_route,
        },
    },
};

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_route))
        .route("/health", get(health_route))
        .route("/keyword-embedding", post(keyword_embedding_route))
        .route("/users/{user_id}/queries", post(append_query_route))
        .route("/users/{user_id}/recent", get(recent_window_route))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl+C.
pub async fn start(state: Arc<AppState>, addr: &str) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
