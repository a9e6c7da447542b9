//! # Storefront Core
//! 
//! Session domain types, service logic, and the ports (store and audit
//! logger traits) the infrastructure crate implements.

pub mod domain;
pub mod ports;
pub mod services;
pub mod error;

// Re-export domain types
pub use domain::*;
pub use error::{AuditError, DomainError};
pub use ports::{AuditLogger, SessionStore};
pub use services::{LogoutOutcome, LogoutService, SessionOutcome, SessionService};
