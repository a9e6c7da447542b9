//! Identity read from the session's `user` blob

use serde_json::Value;
use storefront_shared::constants::UNKNOWN_IDENTITY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: String,
    pub username: String,
}

impl SessionIdentity {
    /// Reads `id` and `username` from a decoded user blob.
    ///
    /// Numbers render in decimal; anything missing falls back to `unknown`.
    pub fn from_user(user: &Value) -> Self {
        Self {
            user_id: field_as_string(user, "id"),
            username: field_as_string(user, "username"),
        }
    }
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self {
            user_id: UNKNOWN_IDENTITY.to_string(),
            username: UNKNOWN_IDENTITY.to_string(),
        }
    }
}

fn field_as_string(user: &Value, field: &str) -> String {
    match user.get(field) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => UNKNOWN_IDENTITY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_id() {
        let identity = SessionIdentity::from_user(&json!({"id": 42, "username": "alice"}));
        assert_eq!(identity.user_id, "42");
        assert_eq!(identity.username, "alice");
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let identity = SessionIdentity::from_user(&json!({"email": "a@example.com"}));
        assert_eq!(identity, SessionIdentity::default());
        assert_eq!(identity.user_id, UNKNOWN_IDENTITY);
    }

    #[test]
    fn test_non_object_user() {
        let identity = SessionIdentity::from_user(&json!("alice"));
        assert_eq!(identity, SessionIdentity::default());
    }
}
