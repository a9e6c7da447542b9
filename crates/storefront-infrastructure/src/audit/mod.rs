//! Audit logger adapters

pub mod postgres;
pub mod queued;

use async_trait::async_trait;
use storefront_core::{AuditEntry, AuditError, AuditLogger};
use tracing::info;

pub use postgres::PgAuditLogger;
pub use queued::{AuditWorkers, BatchWriter, QueueConfig, QueuedAuditLogger};

/// Writes entries to the `audit` tracing target only. Used when no
/// relational store is configured for audit.
#[derive(Debug, Default, Clone)]
pub struct TracingAuditLogger;

#[async_trait]
impl AuditLogger for TracingAuditLogger {
    async fn log_user_activity(&self, entry: AuditEntry) -> Result<(), AuditError> {
        info!(
            target: "audit",
            user_id = %entry.user_id,
            action = %entry.action,
            source_ip = %entry.source_ip,
            "{}",
            entry.message
        );
        Ok(())
    }
}
