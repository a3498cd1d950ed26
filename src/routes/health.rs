use axum::{routing::get, Json, Router};
use crate::models::HealthResponse;

pub const SERVICE_NAME: &str = "document-classifier";

pub fn router() -> Router {
    Router::new()
        .route("/api/v1/health", get(health_check))
}

async fn health_check() -> Json<HealthResponse> {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    Json(response)
}
