use axum::{extract::State, routing::get, Json, Router};

use crate::models::{AppState, HealthResponse, RootResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Financial Document Analyzer API is running".to_string(),
    })
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        search_available: state.orchestrator.toolbox().search_available(),
        model: state.config.llm.model.clone(),
    };

    Json(response)
}
