//! Database connection provider
//!
//! One pool per process, created on first use and shared afterwards. A failed
//! connect is not cached, so the next caller tries again. There is no retry
//! loop: each attempt fails within the acquire timeout.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use storefront_shared::config::DatabaseSettings;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{error, info};

/// Connection failure. Display text never carries credentials or driver
/// detail; the underlying error is kept as the source for server-side logs.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("database at {host}:{port} is unreachable")]
    Unreachable {
        host: String,
        port: u16,
        #[source]
        source: sqlx::Error,
    },

    #[error("database rejected the configured credentials")]
    Rejected(#[source] sqlx::Error),

    #[error("timed out waiting for a database connection")]
    Timeout,

    #[error("database operation failed")]
    Failed(#[source] sqlx::Error),
}

impl ConnectionError {
    fn classify(settings_host: &str, settings_port: u16, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) => Self::Unreachable {
                host: settings_host.to_string(),
                port: settings_port,
                source: err,
            },
            sqlx::Error::PoolTimedOut => Self::Timeout,
            sqlx::Error::Database(ref db_err)
                if matches!(db_err.code().as_deref(), Some("28P01") | Some("28000")) =>
            {
                Self::Rejected(err)
            }
            other => Self::Failed(other),
        }
    }
}

pub struct Database {
    options: PgConnectOptions,
    host: String,
    port: u16,
    max_connections: u32,
    acquire_timeout: Duration,
    pool: OnceCell<PgPool>,
}

impl Database {
    pub fn new(settings: &DatabaseSettings) -> Self {
        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .database(&settings.name)
            .username(&settings.username)
            .password(&settings.password)
            .options([("client_encoding", settings.charset.as_str())]);

        Self {
            options,
            host: settings.host.clone(),
            port: settings.port,
            max_connections: settings.max_connections,
            acquire_timeout: Duration::from_secs(settings.acquire_timeout_seconds),
            pool: OnceCell::new(),
        }
    }

    /// Returns the shared pool, connecting on first call.
    pub async fn get_connection(&self) -> Result<PgPool, ConnectionError> {
        self.pool
            .get_or_try_init(|| async {
                info!("Connecting to database at {}:{}...", self.host, self.port);
                PgPoolOptions::new()
                    .max_connections(self.max_connections)
                    .acquire_timeout(self.acquire_timeout)
                    .connect_with(self.options.clone())
                    .await
                    .map_err(|e| {
                        let err = ConnectionError::classify(&self.host, self.port, e);
                        error!("Database connection failed: {:?}", err);
                        err
                    })
            })
            .await
            .cloned()
    }

    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }

    pub async fn ping(&self) -> Result<(), ConnectionError> {
        let pool = self.get_connection().await?;
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| self.classify(e))?;
        Ok(())
    }

    pub async fn run_migrations(&self) -> Result<(), ConnectionError> {
        let pool = self.get_connection().await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| ConnectionError::Failed(sqlx::Error::Migrate(Box::new(e))))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Maps a query error with this database's host/port context.
    pub fn classify(&self, err: sqlx::Error) -> ConnectionError {
        ConnectionError::classify(&self.host, self.port, err)
    }
}
