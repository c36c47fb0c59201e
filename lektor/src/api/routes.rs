use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::home))
        .route("/api/diag", get(handlers::diag))
        .route("/chat", post(handlers::chat))
        .route("/api/agent", post(handlers::agent))
        .route("/api/agent-tts", post(handlers::agent_tts))
        .route("/api/agent-ocr-tts", post(handlers::agent_ocr_tts))
        .route("/api/ocr", post(handlers::ocr))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
