//! Axum route handlers for interview sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::candidates::domains::resolve_domain;
use crate::candidates::validation::validate_identity;
use crate::candidates::CandidateIdentity;
use crate::errors::AppError;
use crate::interview::controller::{spawn_session, SessionHandle};
use crate::interview::models::{Phase, SessionSnapshot};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub identity: CandidateIdentity,
    pub domain: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

/// POST /api/v1/sessions
///
/// Validates identity and domain, starts the session and waits for its questions.
pub async fn handle_start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let identity = validate_identity(&request.identity)?;
    let domain = resolve_domain(&request.domain)
        .ok_or_else(|| AppError::Validation(format!("Unknown domain '{}'", request.domain)))?;

    let handle = spawn_session(
        identity,
        domain.title.to_string(),
        state.services.clone(),
        state.results.clone(),
        state.sessions.clone(),
        state.config.interview_duration_secs,
    )
    .await;

    let snapshot = handle.ready().await;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = lookup(&state, id).await?;
    let snapshot = handle.snapshot();
    release_if_done(&state, &snapshot).await;
    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/:id/answers
///
/// Blank answers → 400. Submissions while evaluating or finalizing → 409.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = lookup(&state, id).await?;
    let snapshot = handle.submit(request.answer).await?;
    release_if_done(&state, &snapshot).await;
    Ok(Json(snapshot))
}

async fn lookup(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// A finished session is dropped from the registry as soon as its final snapshot has been served,
/// ahead of the controller's own release.
async fn release_if_done(state: &AppState, snapshot: &SessionSnapshot) {
    if snapshot.phase == Phase::Done {
        state.sessions.remove(snapshot.session_id).await;
    }
}
