//! Session store adapters

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::MemorySessionStore;
pub use postgres::PgSessionStore;
pub use redis::RedisSessionStore;
