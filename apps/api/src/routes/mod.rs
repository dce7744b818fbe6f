pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers;
use crate::samples;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Feedback API
        .route(
            "/api/v1/feedback/translation",
            post(handlers::handle_translation_feedback),
        )
        .route(
            "/api/v1/feedback/essay",
            post(handlers::handle_essay_feedback),
        )
        // Fixed practice content
        .route(
            "/api/v1/samples/sentences",
            get(samples::handle_sample_sentences),
        )
        .route(
            "/api/v1/samples/prompts",
            get(samples::handle_sample_prompts),
        )
        .with_state(state)
}
