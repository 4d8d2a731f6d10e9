//! Axum route handlers for the HR dashboard.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::results::dashboard::{compute_stats, select, DashboardStats, ResultFilter};
use crate::results::StoredResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ResultsQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filter: ResultFilter,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<StoredResult>,
    pub stats: DashboardStats,
}

/// GET /api/v1/results?search=&filter=
pub async fn handle_list_results(
    State(state): State<AppState>,
    Query(params): Query<ResultsQuery>,
) -> Result<Json<ResultsResponse>, AppError> {
    let all = state.results.list().await?;
    let stats = compute_stats(&all);
    let results = select(all, &params.search, params.filter);
    Ok(Json(ResultsResponse { results, stats }))
}

/// GET /api/v1/results/:id
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredResult>, AppError> {
    state
        .results
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Result {id} not found")))
}
