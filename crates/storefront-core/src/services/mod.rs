//! Domain services (business logic)

pub mod session_service;
pub mod logout_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use session_service::{SessionOutcome, SessionService};
pub use logout_service::{LogoutOutcome, LogoutService};
