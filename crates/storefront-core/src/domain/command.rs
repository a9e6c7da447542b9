//! Request body dispatch for the session endpoint

use serde_json::Value;

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Set(Value),
    Clear,
}

impl SessionCommand {
    /// Decides what a raw request body asks for.
    ///
    /// A truthy `clear` field on an object clears the session; any other
    /// truthy body is stored. Empty, unparseable or falsy bodies are invalid.
    pub fn from_body(body: &[u8]) -> Result<Self, DomainError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(DomainError::InvalidInput("empty request body".to_string()));
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| DomainError::InvalidInput(format!("body is not JSON: {}", e)))?;

        if value.get("clear").is_some_and(is_truthy) {
            return Ok(Self::Clear);
        }

        if !is_truthy(&value) {
            return Err(DomainError::InvalidInput("empty payload".to_string()));
        }

        Ok(Self::Set(value))
    }
}

/// Loose truthiness: `null`, `false`, `0`, `""`, `"0"` and empty
/// containers are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clear_flag() {
        assert_eq!(SessionCommand::from_body(br#"{"clear": true}"#).unwrap(), SessionCommand::Clear);
        assert_eq!(SessionCommand::from_body(br#"{"clear": 1}"#).unwrap(), SessionCommand::Clear);
        assert_eq!(
            SessionCommand::from_body(br#"{"clear": true, "id": 7}"#).unwrap(),
            SessionCommand::Clear
        );
    }

    #[test]
    fn test_falsy_clear_is_stored() {
        let command = SessionCommand::from_body(br#"{"clear": false, "id": 7}"#).unwrap();
        assert_eq!(command, SessionCommand::Set(json!({"clear": false, "id": 7})));
    }

    #[test]
    fn test_payload_is_stored() {
        let command = SessionCommand::from_body(br#"{"foo":"bar"}"#).unwrap();
        assert_eq!(command, SessionCommand::Set(json!({"foo": "bar"})));
    }

    #[test]
    fn test_non_object_payloads_are_stored() {
        let cases: [(&[u8], Value); 4] = [
            (b"[1,2]", json!([1, 2])),
            (br#""alice""#, json!("alice")),
            (b"42", json!(42)),
            (b"true", json!(true)),
        ];
        for (body, expected) in cases {
            assert_eq!(SessionCommand::from_body(body).unwrap(), SessionCommand::Set(expected));
        }
    }

    #[test]
    fn test_invalid_bodies() {
        let bodies: [&[u8]; 9] = [b"", b"   ", b"{", b"null", b"{}", b"[]", b"false", b"0", b"\"\""];
        for body in bodies {
            assert!(
                matches!(SessionCommand::from_body(body), Err(DomainError::InvalidInput(_))),
                "body {:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!(0.5)));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!(0.0)));
    }
}
