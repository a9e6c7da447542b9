//! # Storefront Infrastructure
//! 
//! Database, session store, and audit logger implementations (adapters).

pub mod database;
pub mod session;
pub mod audit;

pub use database::{ConnectionError, Database};
pub use session::{MemorySessionStore, PgSessionStore, RedisSessionStore};
pub use audit::{AuditWorkers, PgAuditLogger, QueuedAuditLogger, QueueConfig, TracingAuditLogger};
