use axum::{response::IntoResponse, Json};
use serde_json::json;

/// 存活探针
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
