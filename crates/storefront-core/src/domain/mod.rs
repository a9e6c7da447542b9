//! # Storefront Core - Domain Module
//! 
//! Session, identity, audit and command types.

pub mod session;
pub mod identity;
pub mod audit;
pub mod command;

pub use session::{SessionData, SessionId};
pub use identity::SessionIdentity;
pub use audit::AuditEntry;
pub use command::{is_truthy, SessionCommand};
