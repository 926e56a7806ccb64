//! API Routes
//!
//! - `GET /` - liveness message
//! - `GET /health` - health check with capability flags
//! - `POST /analyze` - upload a PDF and run the analysis crew

pub mod analyze;
pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::cors_layer;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let max_upload_bytes = state.config.server.max_upload_bytes;
    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .merge(health::router(state.clone()))
        .merge(analyze::router(state))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
