//! In-test session store fakes

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{SessionData, SessionId};
use crate::error::DomainError;
use crate::ports::SessionStore;

#[derive(Default)]
pub struct InMemoryStore {
    sessions: Mutex<HashMap<SessionId, SessionData>>,
}

impl InMemoryStore {
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self, id: &SessionId) -> Option<SessionData> {
        self.sessions.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError> {
        Ok(self.snapshot(id))
    }

    async fn save(&self, id: &SessionId, data: &SessionData) -> Result<(), DomainError> {
        self.sessions.lock().unwrap().insert(id.clone(), data.clone());
        Ok(())
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), DomainError> {
        self.sessions.lock().unwrap().remove(id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<usize, DomainError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, data| !data.is_expired());
        Ok(before - sessions.len())
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Store whose every call fails as if the backend were down.
pub struct FailingStore;

#[async_trait]
impl SessionStore for FailingStore {
    async fn load(&self, _id: &SessionId) -> Result<Option<SessionData>, DomainError> {
        Err(DomainError::StoreUnavailable("store offline".to_string()))
    }

    async fn save(&self, _id: &SessionId, _data: &SessionData) -> Result<(), DomainError> {
        Err(DomainError::StoreUnavailable("store offline".to_string()))
    }

    async fn destroy(&self, _id: &SessionId) -> Result<(), DomainError> {
        Err(DomainError::StoreUnavailable("store offline".to_string()))
    }

    async fn cleanup_expired(&self) -> Result<usize, DomainError> {
        Err(DomainError::StoreUnavailable("store offline".to_string()))
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Err(DomainError::StoreUnavailable("store offline".to_string()))
    }
}
