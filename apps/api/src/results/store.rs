use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::interview::models::SessionResult;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt result row: {0}")]
    Corrupt(String),
}

/// A persisted session result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredResult {
    pub id: Uuid,
    #[serde(flatten)]
    pub result: SessionResult,
}

/// The Result Sink the session controller hands finished sessions to,
/// and the source the HR dashboard reads from.
///
/// Carried in `AppState` as `Arc<dyn ResultStore>`.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save(&self, result: &SessionResult) -> Result<Uuid, StoreError>;

    /// All results, newest first.
    async fn list(&self) -> Result<Vec<StoredResult>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<StoredResult>, StoreError>;
}

/// Process-local store used when no database is configured. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryResultStore {
    results: RwLock<Vec<StoredResult>>,
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn save(&self, result: &SessionResult) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.results.write().await.push(StoredResult {
            id,
            result: result.clone(),
        });
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<StoredResult>, StoreError> {
        let mut results = self.results.read().await.clone();
        results.sort_by(|a, b| b.result.completed_at.cmp(&a.result.completed_at));
        Ok(results)
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredResult>, StoreError> {
        Ok(self
            .results
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::Recommendation;
    use crate::interview::testing::identity;
    use chrono::{Duration, Utc};

    fn result_at(minutes_ago: i64) -> SessionResult {
        SessionResult {
            identity: identity().with_domain("Finance"),
            domain: "Finance".to_string(),
            responses: vec![],
            score: 0,
            recommendation: Recommendation::NotRecommended,
            summary: "n/a".to_string(),
            completed_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let store = MemoryResultStore::default();
        let id = store.save(&result_at(0)).await.unwrap();
        let fetched = store.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.result.domain, "Finance");
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemoryResultStore::default();
        let older = store.save(&result_at(30)).await.unwrap();
        let newer = store.save(&result_at(1)).await.unwrap();
        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![newer, older]);
    }

    #[tokio::test]
    async fn test_stored_result_flattens_record() {
        let store = MemoryResultStore::default();
        let id = store.save(&result_at(0)).await.unwrap();
        let json = serde_json::to_value(store.get(id).await.unwrap().unwrap()).unwrap();
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["recommendation"], "not_recommended");
        assert_eq!(json["identity"]["full_name"], "Asha Rao");
    }
}
