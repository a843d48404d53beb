//! Single-use account tokens (activation, invite, password reset).
//!
//! The plaintext token is mailed to the user; only its SHA-256 digest is
//! persisted. Redemption re-hashes the presented token and matches it against
//! the stored digest, so a database leak never exposes a usable token.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a fresh plaintext token (hex, 64 chars)
pub fn generate() -> String {
    hash(&Uuid::new_v4().to_string())
}

/// Digest used for storage and lookup
pub fn hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn matches(token: &str, hashed: &str) -> bool {
    hash(token) == hashed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash("abc"), hash("abc"));
        assert_ne!(hash("abc"), hash("abd"));
    }

    #[test]
    fn generated_tokens_are_unique() {
        assert_ne!(generate(), generate());
    }

    #[test]
    fn stored_digest_differs_from_plaintext() {
        let token = generate();
        let stored = hash(&token);
        assert_ne!(token, stored);
        assert!(matches(&token, &stored));
        assert!(!matches("something-else", &stored));
    }
}
