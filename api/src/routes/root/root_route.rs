use axum::Json;
use serde_json::{Value, json};

/// Handler: GET /
pub async fn root_route() -> Json<Value> {
    Json(json!({ "message": "keyword embedding service is running" }))
}
