//! API Routes
//!
//! - `POST /api/v1/classify` - Upload a document and get its routing decision
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/routing-rules` - Category to destination table
//! - `GET /` - Service info

pub mod classify;
pub mod health;
pub mod routing_rules;

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::{AppState, ServiceInfo};

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let body_limit = state.classifier.max_upload_bytes() + MULTIPART_OVERHEAD_BYTES;
    let allowed_origins = state.config.server.cors_allowed_origins.clone();

    let router = Router::new()
        .route("/", get(service_info))
        .merge(classify::router(state.clone()))
        .merge(routing_rules::router(state))
        .merge(health::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &allowed_origins)
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Document Classifier API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        classify_endpoint: "/api/v1/classify".to_string(),
        health_check: "/api/v1/health".to_string(),
        routing_rules: "/api/v1/routing-rules".to_string(),
    })
}
