//! Ports implemented by the infrastructure crate

pub mod session_store;
pub mod audit_logger;

pub use session_store::SessionStore;
pub use audit_logger::AuditLogger;

#[cfg(test)]
pub use audit_logger::MockAuditLogger;
