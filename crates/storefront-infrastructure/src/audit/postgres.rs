//! Direct audit writes to `tbl_user_activity_logs`

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use storefront_core::{AuditEntry, AuditError, AuditLogger};
use tracing::error;

use crate::audit::queued::BatchWriter;
use crate::database::Database;

/// One INSERT per entry, on the caller's task.
pub struct PgAuditLogger {
    db: Arc<Database>,
}

impl PgAuditLogger {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditLogger for PgAuditLogger {
    async fn log_user_activity(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.write_batch(std::slice::from_ref(&entry)).await.map(|_| ())
    }
}

#[async_trait]
impl BatchWriter for PgAuditLogger {
    async fn write_batch(&self, entries: &[AuditEntry]) -> Result<usize, AuditError> {
        let pool = self
            .db
            .get_connection()
            .await
            .map_err(|e| AuditError::Unavailable(e.to_string()))?;

        insert_batch(&pool, entries)
            .await
            .map_err(|e| {
                error!("Audit insert of {} entries failed: {}", entries.len(), e);
                AuditError::WriteFailed(self.db.classify(e).to_string())
            })
    }
}

/// Bulk insert of `entries` in one statement.
async fn insert_batch(pool: &PgPool, entries: &[AuditEntry]) -> Result<usize, sqlx::Error> {
    let mut query_builder = sqlx::QueryBuilder::new(
        r#"
        INSERT INTO tbl_user_activity_logs (
            id, user_id, action, message, ip_address, created_at
        )
        "#,
    );

    query_builder.push_values(entries, |mut b, entry| {
        b.push_bind(entry.id)
            .push_bind(&entry.user_id)
            .push_bind(&entry.action)
            .push_bind(&entry.message)
            .push_bind(&entry.source_ip)
            .push_bind(entry.created_at);
    });

    let result = query_builder.build().execute(pool).await?;
    Ok(result.rows_affected() as usize)
}
