//! Audit log entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::SessionIdentity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub user_id: String,
    pub action: String,
    pub message: String,
    pub source_ip: String,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        user_id: impl Into<String>,
        action: impl Into<String>,
        message: impl Into<String>,
        source_ip: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            action: action.into(),
            message: message.into(),
            source_ip: source_ip.into(),
            created_at: Utc::now(),
        }
    }

    pub fn logout(identity: &SessionIdentity, source_ip: impl Into<String>) -> Self {
        Self::new(
            identity.user_id.clone(),
            storefront_shared::constants::AUDIT_ACTION_LOGOUT,
            format!("User {} logged out", identity.username),
            source_ip,
        )
    }
}
