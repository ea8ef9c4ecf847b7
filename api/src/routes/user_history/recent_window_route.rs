use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use query_history::RecentWindow;

use crate::{core::app_state::AppState, error_handler::AppResult};

/// Handler: GET /users/{user_id}/recent
///
/// Unknown users get an all-empty window.
pub async fn recent_window_route(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<RecentWindow>> {
    Ok(Json(state.store.recent(&user_id).await?))
}
