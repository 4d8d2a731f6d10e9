//! PostgreSQL-backed result store.
//!
//! Expects a `candidate_results` table:
//! `id UUID PRIMARY KEY, full_name TEXT, phone TEXT, registration_no TEXT,
//! domain TEXT, responses JSONB, score INT, recommendation TEXT, summary TEXT,
//! completed_at TIMESTAMPTZ`. Schema management is left to deployment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::candidates::CandidateIdentity;
use crate::interview::models::{Recommendation, Response, SessionResult};
use crate::interview::scoring::MAX_SCORE;
use crate::results::store::{ResultStore, StoreError, StoredResult};

#[derive(Debug, FromRow)]
struct CandidateResultRow {
    id: Uuid,
    full_name: String,
    phone: String,
    registration_no: String,
    domain: String,
    responses: Json<Vec<Response>>,
    score: i32,
    recommendation: String,
    summary: String,
    completed_at: DateTime<Utc>,
}

impl TryFrom<CandidateResultRow> for StoredResult {
    type Error = StoreError;

    fn try_from(row: CandidateResultRow) -> Result<Self, Self::Error> {
        let recommendation: Recommendation = row.recommendation.parse().map_err(StoreError::Corrupt)?;
        let score = u32::try_from(row.score)
            .ok()
            .filter(|s| *s <= MAX_SCORE)
            .ok_or_else(|| StoreError::Corrupt(format!("score {} out of range", row.score)))?;

        Ok(StoredResult {
            id: row.id,
            result: SessionResult {
                identity: CandidateIdentity {
                    full_name: row.full_name,
                    phone: row.phone,
                    registration_no: row.registration_no,
                    domain: Some(row.domain.clone()),
                },
                domain: row.domain,
                responses: row.responses.0,
                score,
                recommendation,
                summary: row.summary,
                completed_at: row.completed_at,
            },
        })
    }
}

pub struct PgResultStore {
    pool: PgPool,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    async fn save(&self, result: &SessionResult) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO candidate_results
                (id, full_name, phone, registration_no, domain, responses,
                 score, recommendation, summary, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(id)
        .bind(&result.identity.full_name)
        .bind(&result.identity.phone)
        .bind(&result.identity.registration_no)
        .bind(&result.domain)
        .bind(Json(&result.responses))
        .bind(result.score as i32)
        .bind(result.recommendation.as_str())
        .bind(&result.summary)
        .bind(result.completed_at)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list(&self) -> Result<Vec<StoredResult>, StoreError> {
        sqlx::query_as::<_, CandidateResultRow>(
            "SELECT * FROM candidate_results ORDER BY completed_at DESC",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(StoredResult::try_from)
        .collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredResult>, StoreError> {
        let row: Option<CandidateResultRow> =
            sqlx::query_as("SELECT * FROM candidate_results WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(StoredResult::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(recommendation: &str, score: i32) -> CandidateResultRow {
        CandidateResultRow {
            id: Uuid::new_v4(),
            full_name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            registration_no: "REG001".to_string(),
            domain: "Finance".to_string(),
            responses: Json(vec![Response {
                question: "Q?".to_string(),
                answer: "A.".to_string(),
                score: 72,
            }]),
            score,
            recommendation: recommendation.to_string(),
            summary: "Solid.".to_string(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_to_stored_result() {
        let stored = StoredResult::try_from(row("recommended", 72)).unwrap();
        assert_eq!(stored.result.score, 72);
        assert_eq!(stored.result.recommendation, Recommendation::Recommended);
        assert_eq!(stored.result.identity.domain.as_deref(), Some("Finance"));
        assert_eq!(stored.result.responses.len(), 1);
    }

    #[test]
    fn test_unknown_recommendation_is_corrupt() {
        let err = StoredResult::try_from(row("maybe", 72)).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn test_out_of_range_score_is_corrupt() {
        assert!(matches!(
            StoredResult::try_from(row("recommended", -1)),
            Err(StoreError::Corrupt(_))
        ));
        assert!(matches!(
            StoredResult::try_from(row("recommended", 101)),
            Err(StoreError::Corrupt(_))
        ));
    }
}
