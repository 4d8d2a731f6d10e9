use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::interview::controller::SessionHandle;
use crate::interview::models::Phase;

/// Live sessions by id. Each entry is only a handle; session state lives in its controller task.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    pub async fn insert(&self, handle: SessionHandle) {
        self.sessions.write().await.insert(handle.id(), handle);
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.write().await.remove(&id)
    }

    /// Sessions that have not reached `Done`. Finished sessions still awaiting
    /// release are not counted.
    pub async fn active(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|handle| handle.snapshot().phase != Phase::Done)
            .count()
    }
}
