use axum::Json;
use serde_json::{Value, json};
use tracing::debug;

/// Handler for GET /health/check
pub async fn health_handler() -> Json<Value> {
    debug!("Health check requested");
    Json(json!({ "status": "ok" }))
}

/// Handler for GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "hello": "world" }))
}
