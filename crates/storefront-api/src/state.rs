use std::sync::Arc;

use storefront_core::{LogoutService, SessionService};
use storefront_infrastructure::Database;
use storefront_shared::config::SessionSettings;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionService>,
    pub logout: Arc<LogoutService>,
    pub session_settings: Arc<SessionSettings>,
    /// Present only when a component is backed by the relational store.
    pub database: Option<Arc<Database>>,
    pub trust_proxy_headers: bool,
}
