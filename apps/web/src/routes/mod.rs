pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::pages::{answers, intro, upload};
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pages
        .route("/", get(intro::show_introduction))
        .route("/introduction", get(intro::show_introduction))
        .route(
            "/upload",
            get(upload::show_upload).post(upload::submit_upload),
        )
        .route("/answers", get(answers::show_answers))
        .route("/session/reset", post(answers::reset_session))
        // JSON API
        .route("/api/v1/extract", post(handlers::handle_extract))
        .route("/api/v1/questions", post(handlers::handle_questions))
        .route("/api/v1/answers", post(handlers::handle_answers))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
