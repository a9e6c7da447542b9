use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use storefront_api::{build_router, AppState};
use storefront_core::{AuditLogger, LogoutService, SessionService, SessionStore};
use storefront_infrastructure::{
    AuditWorkers, Database, MemorySessionStore, PgAuditLogger, PgSessionStore, QueueConfig, QueuedAuditLogger,
    RedisSessionStore, TracingAuditLogger,
};
use storefront_shared::config::{AppConfig, AuditMode, SessionBackend};
use tracing::{error, info, warn};

/// How long queued audit entries may take to flush after the server stops.
const AUDIT_DRAIN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry; the guard flushes the file writer on exit
    let _log_guard = storefront_shared::telemetry::init_telemetry(&config.telemetry)?;

    info!("Storefront session server starting ({} env)...", config.app.env);

    // Database (only when something is backed by it)
    let database = if config.needs_database() {
        let db = Arc::new(Database::new(&config.database));
        db.get_connection().await?;
        info!("Database connection established.");
        if config.database.run_migrations {
            db.run_migrations().await?;
        }
        Some(db)
    } else {
        None
    };

    let store = build_session_store(&config, database.as_ref())?;
    let (audit, audit_workers) = build_audit_logger(&config, database.as_ref())?;

    let ttl = chrono::Duration::seconds(config.session.ttl_seconds);
    let sessions = Arc::new(SessionService::new(store, ttl));
    let logout = Arc::new(LogoutService::new(sessions.clone(), audit));

    spawn_cleanup_task(
        sessions.clone(),
        Duration::from_secs(config.session.cleanup_interval_seconds),
    );

    // Create App State
    let state = AppState {
        sessions,
        logout,
        session_settings: Arc::new(config.session.clone()),
        database,
        trust_proxy_headers: config.app.trust_proxy_headers,
    };

    let app = build_router(state, &config.cors.allowed_origins);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router and its state are gone, so the queue senders are closed
    if let Some(workers) = audit_workers {
        workers.drain(AUDIT_DRAIN_GRACE).await;
    }

    info!("Storefront session server stopped");
    Ok(())
}

fn build_session_store(
    config: &AppConfig,
    database: Option<&Arc<Database>>,
) -> anyhow::Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match config.session.backend {
        SessionBackend::Memory => {
            warn!("Using in-memory session store; sessions are lost on restart");
            Arc::new(MemorySessionStore::new())
        }
        SessionBackend::Postgres => {
            let db = database
                .ok_or_else(|| anyhow::anyhow!("postgres session backend needs a database"))?;
            Arc::new(PgSessionStore::new(db.clone()))
        }
        SessionBackend::Redis => Arc::new(RedisSessionStore::new(&config.redis)?),
    };
    info!("Session backend: {:?}", config.session.backend);
    Ok(store)
}

fn build_audit_logger(
    config: &AppConfig,
    database: Option<&Arc<Database>>,
) -> anyhow::Result<(Arc<dyn AuditLogger>, Option<AuditWorkers>)> {
    let built: (Arc<dyn AuditLogger>, Option<AuditWorkers>) = match (config.audit.mode, database) {
        (AuditMode::Disabled, _) => (Arc::new(TracingAuditLogger), None),
        (AuditMode::Direct, Some(db)) => (Arc::new(PgAuditLogger::new(db.clone())), None),
        (AuditMode::Queued, Some(db)) => {
            let (logger, workers) = QueuedAuditLogger::new(
                Arc::new(PgAuditLogger::new(db.clone())),
                QueueConfig::from(&config.audit),
            );
            (Arc::new(logger), Some(workers))
        }
        (mode, None) => anyhow::bail!("audit mode {:?} needs a database", mode),
    };
    info!("Audit mode: {:?}", config.audit.mode);
    Ok(built)
}

/// Purges expired sessions on a fixed interval.
fn spawn_cleanup_task(sessions: Arc<SessionService>, every: Duration) {
    if every.is_zero() {
        return;
    }

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // First tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = sessions.cleanup_expired().await {
                error!("Session cleanup failed: {}", e);
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
