//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Failure of the audit collaborator. Never surfaced to clients.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit backend unavailable: {0}")]
    Unavailable(String),

    #[error("Audit write failed: {0}")]
    WriteFailed(String),

    #[error("Audit queue rejected entry: {0}")]
    QueueFull(String),
}
