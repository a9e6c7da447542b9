use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use storefront_core::{DomainError, SessionData, SessionId, SessionStore};
use tracing::{debug, info};

/// Thread-safe in-memory session store.
/// Uses DashMap for lock-free concurrent access; contents die with the process.
#[derive(Clone)]
pub struct MemorySessionStore {
    storage: Arc<DashMap<SessionId, SessionData>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        info!("Initializing in-memory session store with DashMap");
        Self {
            storage: Arc::new(DashMap::new()),
        }
    }

    /// Number of stored sessions, expired ones included
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError> {
        Ok(self.storage.get(id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, id: &SessionId, data: &SessionData) -> Result<(), DomainError> {
        self.storage.insert(id.clone(), data.clone());
        debug!("Stored session {:?} in memory", id);
        Ok(())
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), DomainError> {
        self.storage.remove(id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<usize, DomainError> {
        let start_len = self.storage.len();
        self.storage.retain(|_, data: &mut SessionData| !data.is_expired());
        Ok(start_len.saturating_sub(self.storage.len()))
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[tokio::test]
    async fn test_basic_operations() {
        let store = MemorySessionStore::new();
        let id = SessionId::generate();
        let mut data = SessionData::new(Duration::minutes(5));
        data.set_user(&json!({"id": 1})).unwrap();

        store.save(&id, &data).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load(&id).await.unwrap(), Some(data));

        store.destroy(&id).await.unwrap();
        assert!(store.is_empty());
        assert_eq!(store.load(&id).await.unwrap(), None);

        // Destroying again is a no-op
        store.destroy(&id).await.unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let store = MemorySessionStore::new();
        store
            .save(&SessionId::generate(), &SessionData::new(Duration::seconds(-1)))
            .await
            .unwrap();
        store
            .save(&SessionId::generate(), &SessionData::new(Duration::minutes(5)))
            .await
            .unwrap();

        assert_eq!(store.cleanup_expired().await.unwrap(), 1);
        assert_eq!(store.len(), 1);
    }
}
