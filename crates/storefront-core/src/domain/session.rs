//! Session domain entity

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_shared::constants::SESSION_USER_KEY;

use crate::domain::SessionIdentity;
use crate::error::DomainError;

/// Opaque session identifier carried in the session cookie.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(storefront_security::generate_session_token())
    }

    /// Accepts only tokens shaped like ones we issue.
    pub fn parse(raw: &str) -> Option<Self> {
        storefront_security::is_well_formed_token(raw).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used by persistent stores in place of the raw token.
    pub fn storage_key(&self) -> String {
        storefront_security::storage_key(&self.0)
    }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({}..)", &self.0[..self.0.len().min(8)])
    }
}

/// Server-side session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub values: HashMap<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            values: HashMap::new(),
            created_at: now,
            updated_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Pushes expiry forward from now.
    pub fn touch(&mut self, ttl: Duration) {
        let now = Utc::now();
        self.updated_at = now;
        self.expires_at = now + ttl;
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Serializes `payload` and stores it under `user`.
    pub fn set_user(&mut self, payload: &Value) -> Result<(), DomainError> {
        let blob = serde_json::to_string(payload)?;
        self.set(SESSION_USER_KEY, Value::String(blob));
        Ok(())
    }

    /// Raw serialized blob stored under `user`.
    pub fn user_blob(&self) -> Option<&str> {
        self.get(SESSION_USER_KEY).and_then(Value::as_str)
    }

    /// The `user` blob parsed back into JSON. `None` if absent or malformed.
    pub fn user(&self) -> Option<Value> {
        self.user_blob()
            .and_then(|blob| serde_json::from_str(blob).ok())
    }

    pub fn identity(&self) -> SessionIdentity {
        self.user()
            .map(|user| SessionIdentity::from_user(&user))
            .unwrap_or_default()
    }
}
