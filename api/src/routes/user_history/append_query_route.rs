use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use keyword_pipeline::KeywordEmbedding;
use tracing::{info, instrument};

use crate::{
    core::app_state::AppState, error_handler::AppResult,
    routes::user_history::append_query_request::AppendQueryRequest,
};

/// Handler: POST /users/{user_id}/queries
///
/// Appends the query to the user's history, then runs extraction and
/// embedding over the updated recent window.
#[instrument(name = "append_query_route", skip(state, body))]
pub async fn append_query_route(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(body): Json<AppendQueryRequest>,
) -> AppResult<Json<KeywordEmbedding>> {
    let (window, out) = state
        .pipeline
        .run_for_user(state.store.as_ref(), &user_id, &body.query, &body.indices)
        .await?;
    info!(current = %window.current_query(), keywords = out.keywords.len(), "query appended");
    Ok(Json(out))
}
