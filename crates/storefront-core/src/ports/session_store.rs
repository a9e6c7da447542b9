//! Session store trait (port)

use async_trait::async_trait;

use crate::domain::{SessionData, SessionId};
use crate::error::DomainError;

/// Keyed session storage.
///
/// Stores hand back whatever they hold, expired or not; expiry is enforced
/// by `SessionService`. Destroying an absent session is not an error.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError>;
    async fn save(&self, id: &SessionId, data: &SessionData) -> Result<(), DomainError>;
    async fn destroy(&self, id: &SessionId) -> Result<(), DomainError>;

    /// Removes expired records, returning how many were dropped.
    async fn cleanup_expired(&self) -> Result<usize, DomainError>;

    async fn health_check(&self) -> Result<(), DomainError>;
}
