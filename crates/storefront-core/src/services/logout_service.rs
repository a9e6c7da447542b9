// ============================================================================
// Storefront Core - Logout Service
// File: crates/storefront-core/src/services/logout_service.rs
// ============================================================================
//! Logout lifecycle: capture identity, destroy session, best-effort audit

use std::net::IpAddr;
use std::sync::Arc;

use storefront_shared::constants::UNKNOWN_IDENTITY;
use tracing::{error, info, warn};

use crate::domain::{AuditEntry, SessionId, SessionIdentity};
use crate::ports::AuditLogger;
use crate::services::SessionService;

/// What happened during a logout. Logout itself never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoutOutcome {
    pub identity: SessionIdentity,
    pub session_destroyed: bool,
    pub audited: bool,
}

pub struct LogoutService {
    sessions: Arc<SessionService>,
    audit: Arc<dyn AuditLogger>,
}

impl LogoutService {
    pub fn new(sessions: Arc<SessionService>, audit: Arc<dyn AuditLogger>) -> Self {
        Self { sessions, audit }
    }

    pub async fn logout(
        &self,
        current: Option<&SessionId>,
        source_ip: Option<IpAddr>,
    ) -> LogoutOutcome {
        // 1. Capture identity before anything is destroyed
        let identity = match self.sessions.load_session(current).await {
            Ok(Some(data)) => data.identity(),
            Ok(None) => SessionIdentity::default(),
            Err(e) => {
                warn!("Could not read session before logout: {}", e);
                SessionIdentity::default()
            }
        };

        // 2. Destroy the session; a store failure must not stop the logout
        let session_destroyed = match self.sessions.clear_session(current).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to destroy session during logout: {}", e);
                false
            }
        };

        // 3. Best-effort audit entry
        let source_ip = source_ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| UNKNOWN_IDENTITY.to_string());
        let entry = AuditEntry::logout(&identity, source_ip);

        let audited = match self.audit.log_user_activity(entry).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Audit log failed for logout of user {}: {}", identity.user_id, e);
                false
            }
        };

        info!("User {} logged out", identity.username);

        LogoutOutcome {
            identity,
            session_destroyed,
            audited,
        }
    }
}
