use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Assembles the application router.
///
/// * `GET /` upload page with client-side scoring
/// * `GET /health`
/// * `POST /api/generate-quiz`
pub fn create_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/generate-quiz", post(handlers::generate_quiz))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
