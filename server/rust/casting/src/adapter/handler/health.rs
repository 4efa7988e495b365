use axum::response::IntoResponse;
use axum::Json;

/// GET /
pub async fn check_app() -> impl IntoResponse {
    Json(serde_json::json!({
        "success": true,
        "description": "App is running.",
    }))
}
