//! POST /keyword-embedding: the direct-input variant.

use std::sync::Arc;

use axum::{Json, extract::State};
use keyword_pipeline::KeywordEmbedding;
use query_history::RecentWindow;
use tracing::{debug, instrument};

use crate::{core::app_state::AppState, error_handler::AppResult};

/// Handler: POST /keyword-embedding
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/keyword-embedding \
///   -H 'content-type: application/json' \
///   -d '{"query_1":"moody rainy city noir","indices_1":"1,2",
///        "query_2":"","indices_2":"","query_3":"","indices_3":""}'
/// ```
#[instrument(name = "keyword_embedding_route", skip_all)]
pub async fn keyword_embedding_route(
    State(state): State<Arc<AppState>>,
    Json(window): Json<RecentWindow>,
) -> AppResult<Json<KeywordEmbedding>> {
    debug!(current = %window.current_query(), "keyword embedding requested");
    let out = state.pipeline.run(&window).await?;
    Ok(Json(out))
}
