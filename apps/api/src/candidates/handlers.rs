//! Axum route handlers for the candidate portal.

use axum::Json;

use crate::candidates::domains::{Domain, DOMAINS};
use crate::candidates::validation::validate_identity;
use crate::candidates::CandidateIdentity;
use crate::errors::AppError;

/// POST /api/v1/candidates/login
///
/// Validates the login form and echoes the normalized identity. No external call is made.
pub async fn handle_login(
    Json(identity): Json<CandidateIdentity>,
) -> Result<Json<CandidateIdentity>, AppError> {
    let identity = validate_identity(&identity)?;
    tracing::info!("Candidate {} logged in", identity.registration_no);
    Ok(Json(identity))
}

/// GET /api/v1/domains
pub async fn handle_list_domains() -> Json<&'static [Domain]> {
    Json(DOMAINS)
}
