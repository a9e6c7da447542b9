//! Database module (PostgreSQL connection provider)

pub mod connection;

pub use connection::{ConnectionError, Database};
