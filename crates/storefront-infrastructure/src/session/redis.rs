//! Redis session store

use async_trait::async_trait;
use chrono::Utc;
use deadpool_redis::redis::{cmd, RedisError};
use deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime};
use storefront_core::{DomainError, SessionData, SessionId, SessionStore};
use storefront_shared::config::RedisSettings;
use tracing::{debug, info};

const KEY_PREFIX: &str = "storefront:session:";

/// Sessions stored as JSON strings; Redis key expiry mirrors `expires_at`.
pub struct RedisSessionStore {
    pool: Pool,
}

impl RedisSessionStore {
    /// Builds the pool. No connection is made until the first command.
    pub fn new(settings: &RedisSettings) -> Result<Self, DomainError> {
        let mut config = Config::from_url(settings.url.clone());
        config.pool = Some(PoolConfig::new(settings.max_connections));

        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;

        info!("Redis session store configured");
        Ok(Self { pool })
    }

    fn key(id: &SessionId) -> String {
        format!("{}{}", KEY_PREFIX, id.storage_key())
    }

    async fn connection(&self) -> Result<Connection, DomainError> {
        self.pool
            .get()
            .await
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))
    }
}

fn storage_error(err: RedisError) -> DomainError {
    if err.is_io_error() || err.is_connection_refusal() || err.is_timeout() {
        DomainError::StoreUnavailable(err.to_string())
    } else {
        DomainError::StorageError(err.to_string())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = cmd("GET")
            .arg(Self::key(id))
            .query_async(&mut conn)
            .await
            .map_err(storage_error)?;

        raw.map(|json| serde_json::from_str(&json).map_err(DomainError::from))
            .transpose()
    }

    async fn save(&self, id: &SessionId, data: &SessionData) -> Result<(), DomainError> {
        let ttl_seconds = (data.expires_at - Utc::now()).num_seconds().max(1);
        let json = serde_json::to_string(data)?;

        let mut conn = self.connection().await?;
        cmd("SET")
            .arg(Self::key(id))
            .arg(json)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async::<()>(&mut conn)
            .await
            .map_err(storage_error)?;

        debug!("Stored session {:?} in redis (ttl {}s)", id, ttl_seconds);
        Ok(())
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        cmd("DEL")
            .arg(Self::key(id))
            .query_async::<()>(&mut conn)
            .await
            .map_err(storage_error)
    }

    async fn cleanup_expired(&self) -> Result<usize, DomainError> {
        // Redis evicts expired keys itself
        Ok(0)
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}
