//! PostgreSQL session store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use storefront_core::{DomainError, SessionData, SessionId, SessionStore};
use tracing::debug;

use crate::database::{ConnectionError, Database};

#[derive(Debug, FromRow)]
struct SessionRow {
    data: Json<HashMap<String, Value>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<SessionRow> for SessionData {
    fn from(row: SessionRow) -> Self {
        Self {
            values: row.data.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
            expires_at: row.expires_at,
        }
    }
}

/// Sessions persisted in `tbl_sessions`, keyed by the hashed token.
pub struct PgSessionStore {
    db: Arc<Database>,
}

impl PgSessionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn pool(&self) -> Result<sqlx::PgPool, DomainError> {
        self.db.get_connection().await.map_err(into_domain)
    }
}

fn into_domain(err: ConnectionError) -> DomainError {
    match err {
        ConnectionError::Failed(source) => DomainError::StorageError(source.to_string()),
        other => DomainError::StoreUnavailable(other.to_string()),
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, SessionRow>(
            r#"SELECT data, created_at, updated_at, expires_at
               FROM tbl_sessions
               WHERE session_key = $1"#,
        )
        .bind(id.storage_key())
        .fetch_optional(&pool)
        .await
        .map_err(|e| into_domain(self.db.classify(e)))?;

        Ok(row.map(SessionData::from))
    }

    async fn save(&self, id: &SessionId, data: &SessionData) -> Result<(), DomainError> {
        let pool = self.pool().await?;
        sqlx::query(
            r#"INSERT INTO tbl_sessions (session_key, data, created_at, updated_at, expires_at)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (session_key) DO UPDATE
               SET data = EXCLUDED.data,
                   updated_at = EXCLUDED.updated_at,
                   expires_at = EXCLUDED.expires_at"#,
        )
        .bind(id.storage_key())
        .bind(Json(&data.values))
        .bind(data.created_at)
        .bind(data.updated_at)
        .bind(data.expires_at)
        .execute(&pool)
        .await
        .map_err(|e| into_domain(self.db.classify(e)))?;

        debug!("Persisted session {:?}", id);
        Ok(())
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), DomainError> {
        let pool = self.pool().await?;
        sqlx::query("DELETE FROM tbl_sessions WHERE session_key = $1")
            .bind(id.storage_key())
            .execute(&pool)
            .await
            .map_err(|e| into_domain(self.db.classify(e)))?;
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<usize, DomainError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM tbl_sessions WHERE expires_at <= NOW()")
            .execute(&pool)
            .await
            .map_err(|e| into_domain(self.db.classify(e)))?;
        Ok(result.rows_affected() as usize)
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        self.db.ping().await.map_err(into_domain)
    }
}
