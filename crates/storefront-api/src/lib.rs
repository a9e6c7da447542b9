//! # Storefront API
//! 
//! HTTP handlers, request context extraction, and the router.

pub mod handlers;
pub mod context;
pub mod error;
pub mod response;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
