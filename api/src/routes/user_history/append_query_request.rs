use serde::Deserialize;

/// Request payload for POST /users/{user_id}/queries.
#[derive(Debug, Deserialize)]
pub struct AppendQueryRequest {
    /// Free-text query to append.
    pub query: String,
    /// Catalogue positions returned alongside the query.
    #[serde(default)]
    pub indices: Vec<String>,
}
