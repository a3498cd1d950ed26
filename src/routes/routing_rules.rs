use axum::{extract::State, routing::get, Json, Router};
use crate::models::{AppState, RoutingRulesResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/routing-rules", get(get_routing_rules))
        .with_state(state)
}

/// GET /api/v1/routing-rules - categories and their destinations
async fn get_routing_rules(State(state): State<AppState>) -> Json<RoutingRulesResponse> {
    let table = state.classifier.routing_table();

    Json(RoutingRulesResponse {
        routing_rules: table
            .rules()
            .iter()
            .map(|rule| (rule.category.clone(), rule.destination.clone()))
            .collect(),
        default_category: table.default_category().to_string(),
        description: "Available document categories and their routing destinations".to_string(),
    })
}
