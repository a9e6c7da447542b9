//! Session token generation

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a hex-encoded session token (32 random bytes).
pub const TOKEN_HEX_LEN: usize = 64;

pub fn generate_session_token() -> String {
    let mut token = [0u8; 32];
    rand::rng().fill(&mut token);
    hex::encode(token)
}

/// Cheap shape check applied to cookie values before any store lookup.
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == TOKEN_HEX_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Key under which a session is persisted. Stores never see the raw token.
pub fn storage_key(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_is_well_formed() {
        let token = generate_session_token();
        assert_eq!(token.len(), TOKEN_HEX_LEN);
        assert!(is_well_formed_token(&token));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_session_token(), generate_session_token());
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert!(!is_well_formed_token(""));
        assert!(!is_well_formed_token("abc"));
        assert!(!is_well_formed_token(&"z".repeat(TOKEN_HEX_LEN)));
    }

    #[test]
    fn test_storage_key_hides_token() {
        let token = generate_session_token();
        let key = storage_key(&token);
        assert_ne!(key, token);
        assert_eq!(key, storage_key(&token));
        assert_eq!(key.len(), 64);
    }
}
