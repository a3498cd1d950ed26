// Document Classifier - AI-powered document classification and routing

pub mod config;
pub mod models;
pub mod types;
pub mod ingest;     // Upload validation and text extraction
pub mod llm;
pub mod classifier; // Prompting, response parsing and the classification pipeline
pub mod routing;    // Category -> destination table
pub mod routes;
pub mod middleware;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
