use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;
use tracing::warn;

use crate::core::{
    app_state::AppState,
    http::response_envelope::{ApiErrorDetail, ApiResponse},
};

/// Handler: GET /health
///
/// Pings the history store. Model providers are not contacted.
pub async fn health_route(State(state): State<Arc<AppState>>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({ "store": "ok" })).into_response(),
        Err(err) => {
            warn!(error = %err, "health: store ping failed");
            ApiResponse::error(
                "STORE_UNAVAILABLE",
                err.to_string(),
                vec![ApiErrorDetail {
                    path: None,
                    hint: Some("Check MONGODB_URI and that the server is reachable.".into()),
                }],
            )
            .into_response_with_status(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
