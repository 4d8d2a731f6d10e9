use std::sync::Arc;

use crate::config::Config;
use crate::interview::{InterviewServices, SessionRegistry};
use crate::results::ResultStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Question, scoring and summary services handed to every new session.
    pub services: InterviewServices,
    /// Postgres when `DATABASE_URL` is set, in-memory otherwise.
    pub results: Arc<dyn ResultStore>,
    pub sessions: SessionRegistry,
}
