//! Audit logger trait (port)

use async_trait::async_trait;

use crate::domain::AuditEntry;
use crate::error::AuditError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLogger: Send + Sync {
    async fn log_user_activity(&self, entry: AuditEntry) -> Result<(), AuditError>;
}
