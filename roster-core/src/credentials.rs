//! One-way credential hashing.
//!
//! Thin wrapper around Argon2id so callers never touch the hashing
//! machinery directly. Verification fails closed: an unparseable stored
//! hash verifies as a mismatch rather than an error.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

/// Failure to produce a hash. Deliberately opaque; the underlying cause
/// is not actionable by callers.
#[derive(Debug, thiserror::Error)]
#[error("failed to hash credential")]
pub struct HashError;

/// Hash a plaintext password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| HashError)
}

/// Check a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("swordfish1").expect("hashes");
        assert!(verify_password("swordfish1", &hash));
        assert!(!verify_password("swordfish2", &hash));
    }

    #[test]
    fn garbage_hash_verifies_as_mismatch() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
