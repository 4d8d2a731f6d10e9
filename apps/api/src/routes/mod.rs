pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::interview::handlers as interview;
use crate::results::handlers as results;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Candidate portal
        .route("/api/v1/candidates/login", post(candidates::handle_login))
        .route("/api/v1/domains", get(candidates::handle_list_domains))
        // Interview sessions
        .route("/api/v1/sessions", post(interview::handle_start_session))
        .route("/api/v1/sessions/:id", get(interview::handle_get_session))
        .route(
            "/api/v1/sessions/:id/answers",
            post(interview::handle_submit_answer),
        )
        // HR dashboard
        .route("/api/v1/results", get(results::handle_list_results))
        .route("/api/v1/results/:id", get(results::handle_get_result))
        .with_state(state)
}
