// ============================================================================
// Storefront Core - Session Service
// File: crates/storefront-core/src/services/session_service.rs
// ============================================================================
//! Session set / clear / load and the request dispatch rule

use std::sync::Arc;

use chrono::Duration;
use serde_json::Value;
use storefront_shared::constants::{MESSAGE_SESSION_CLEARED, MESSAGE_SESSION_UPDATED};
use tracing::{debug, info};

use crate::domain::{SessionCommand, SessionData, SessionId};
use crate::error::DomainError;
use crate::ports::SessionStore;

/// Result of a dispatched session request.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// Payload stored; carries the id of the session that now holds it.
    Updated(SessionId),
    Cleared,
}

impl SessionOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Updated(_) => MESSAGE_SESSION_UPDATED,
            Self::Cleared => MESSAGE_SESSION_CLEARED,
        }
    }
}

pub struct SessionService {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Parses a raw request body and performs the matching operation.
    ///
    /// Invalid bodies fail before the store is touched.
    pub async fn dispatch(
        &self,
        current: Option<&SessionId>,
        body: &[u8],
    ) -> Result<SessionOutcome, DomainError> {
        match SessionCommand::from_body(body)? {
            SessionCommand::Clear => {
                self.clear_session(current).await?;
                Ok(SessionOutcome::Cleared)
            }
            SessionCommand::Set(payload) => {
                let id = self.set_session(current, &payload).await?;
                Ok(SessionOutcome::Updated(id))
            }
        }
    }

    /// Stores `payload` under `user`, creating the session if needed.
    ///
    /// An id that does not name a live session is never adopted; a fresh one
    /// is minted instead.
    pub async fn set_session(
        &self,
        current: Option<&SessionId>,
        payload: &Value,
    ) -> Result<SessionId, DomainError> {
        let existing = match current {
            Some(id) => self.load_session(Some(id)).await?.map(|data| (id.clone(), data)),
            None => None,
        };

        let (id, mut data) = match existing {
            Some((id, mut data)) => {
                data.touch(self.ttl);
                (id, data)
            }
            None => {
                let id = SessionId::generate();
                info!("Creating new session {:?}", id);
                (id, SessionData::new(self.ttl))
            }
        };

        data.set_user(payload)?;
        self.store.save(&id, &data).await?;

        debug!("Session {:?} updated", id);
        Ok(id)
    }

    /// Destroys the whole session record. A missing session is a no-op.
    pub async fn clear_session(&self, current: Option<&SessionId>) -> Result<(), DomainError> {
        if let Some(id) = current {
            self.store.destroy(id).await?;
            debug!("Session {:?} destroyed", id);
        }
        Ok(())
    }

    /// Returns the live session, treating expired records as absent.
    pub async fn load_session(
        &self,
        current: Option<&SessionId>,
    ) -> Result<Option<SessionData>, DomainError> {
        let Some(id) = current else {
            return Ok(None);
        };

        match self.store.load(id).await? {
            Some(data) if data.is_expired() => {
                // Lazy deletion
                self.store.destroy(id).await?;
                debug!("Session {:?} expired, removed", id);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub async fn cleanup_expired(&self) -> Result<usize, DomainError> {
        let removed = self.store.cleanup_expired().await?;
        if removed > 0 {
            info!("Cleaned up {} expired sessions", removed);
        }
        Ok(removed)
    }
}
