//! Session token lifecycle.
//!
//! Tokens are HS256-signed JWTs binding a `sub` account id to a fresh
//! `jti`. They carry no expiry claim: lifecycle is purely explicit, via
//! logout, logout-everywhere, or account deletion. What the store keeps
//! per account is the SHA-256 digest of each outstanding token, so
//! [`verify`] checks both the signature and digest membership - a
//! structurally valid token that has been revoked is just as invalid as
//! a forged one, and the caller cannot tell which check failed.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use roster_core::{StoreError, User, store::UserStore};

/// Signing and verification keys derived from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,   // account id
    iat: i64,    // issued at
    jti: String, // per-token id, makes every issued token unique
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Structural, signature, or membership failure. Deliberately a
    /// single variant: callers must not learn which check failed.
    #[error("invalid token")]
    Invalid,

    #[error("failed to sign token")]
    Sign(#[source] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// SHA-256 hex digest of a token string, the form kept in the account's
/// session set.
pub fn token_hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Issue a fresh token for the account and persist its digest in the
/// session set. Existing tokens stay valid.
pub async fn issue(
    store: &dyn UserStore,
    keys: &TokenKeys,
    user: &mut User,
) -> Result<String, TokenError> {
    let claims = Claims {
        sub: user.id,
        iat: Utc::now().timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
        .map_err(TokenError::Sign)?;

    user.sessions.push(token_hash(&token));
    store.save(user).await?;
    Ok(token)
}

/// Resolve a presented token to its account and session digest.
///
/// Fails closed: malformed tokens, bad signatures, unknown accounts, and
/// revoked sessions all collapse into [`TokenError::Invalid`].
pub async fn verify(
    store: &dyn UserStore,
    keys: &TokenKeys,
    token: &str,
) -> Result<(User, String), TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &keys.decoding, &validation)
        .map_err(|_| TokenError::Invalid)?;

    let user = store
        .get(data.claims.sub)
        .await
        .map_err(|_| TokenError::Invalid)?
        .ok_or(TokenError::Invalid)?;

    let hash = token_hash(token);
    if !user.sessions.iter().any(|s| s == &hash) {
        return Err(TokenError::Invalid);
    }

    Ok((user, hash))
}

/// Remove exactly one session digest from the account. Idempotent when
/// the digest is already gone.
pub async fn revoke(
    store: &dyn UserStore,
    user: &mut User,
    session: &str,
) -> Result<(), StoreError> {
    user.sessions.retain(|s| s != session);
    store.save(user).await
}

/// Clear the whole session set ("logout everywhere").
pub async fn revoke_all(
    store: &dyn UserStore,
    user: &mut User,
) -> Result<(), StoreError> {
    user.sessions.clear();
    store.save(user).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{NewUser, store::MemoryStore};

    fn keys() -> TokenKeys {
        TokenKeys::new("unit-test-signing-secret")
    }

    async fn seeded_user(store: &MemoryStore) -> User {
        store
            .create(NewUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
                age: None,
            })
            .await
            .expect("user created")
    }

    #[tokio::test]
    async fn issued_token_verifies_immediately() {
        let store = MemoryStore::new();
        let keys = keys();
        let mut user = seeded_user(&store).await;

        let token = issue(&store, &keys, &mut user).await.expect("issued");
        let (resolved, session) =
            verify(&store, &keys, &token).await.expect("verifies");

        assert_eq!(resolved.id, user.id);
        assert_eq!(session, token_hash(&token));
    }

    #[tokio::test]
    async fn issuance_keeps_existing_tokens_valid() {
        let store = MemoryStore::new();
        let keys = keys();
        let mut user = seeded_user(&store).await;

        let first = issue(&store, &keys, &mut user).await.expect("first");
        let second = issue(&store, &keys, &mut user).await.expect("second");

        assert_ne!(first, second);
        assert!(verify(&store, &keys, &first).await.is_ok());
        assert!(verify(&store, &keys, &second).await.is_ok());
    }

    #[tokio::test]
    async fn revoke_removes_exactly_one_session() {
        let store = MemoryStore::new();
        let keys = keys();
        let mut user = seeded_user(&store).await;

        let first = issue(&store, &keys, &mut user).await.expect("first");
        let second = issue(&store, &keys, &mut user).await.expect("second");

        revoke(&store, &mut user, &token_hash(&second))
            .await
            .expect("revoked");

        assert!(verify(&store, &keys, &first).await.is_ok());
        assert!(matches!(
            verify(&store, &keys, &second).await,
            Err(TokenError::Invalid)
        ));

        // Revoking again is a no-op, not an error.
        revoke(&store, &mut user, &token_hash(&second))
            .await
            .expect("idempotent");
    }

    #[tokio::test]
    async fn revoke_all_invalidates_everything() {
        let store = MemoryStore::new();
        let keys = keys();
        let mut user = seeded_user(&store).await;

        let tokens = [
            issue(&store, &keys, &mut user).await.expect("a"),
            issue(&store, &keys, &mut user).await.expect("b"),
            issue(&store, &keys, &mut user).await.expect("c"),
        ];

        revoke_all(&store, &mut user).await.expect("cleared");

        for token in tokens {
            assert!(matches!(
                verify(&store, &keys, &token).await,
                Err(TokenError::Invalid)
            ));
        }
    }

    #[tokio::test]
    async fn tampered_and_foreign_tokens_fail_closed() {
        let store = MemoryStore::new();
        let keys = keys();
        let mut user = seeded_user(&store).await;
        let token = issue(&store, &keys, &mut user).await.expect("issued");

        // Garbage input
        assert!(matches!(
            verify(&store, &keys, "not-a-token").await,
            Err(TokenError::Invalid)
        ));

        // Structurally valid but signed with another secret
        let foreign_keys = TokenKeys::new("a-completely-different-secret");
        assert!(matches!(
            verify(&store, &foreign_keys, &token).await,
            Err(TokenError::Invalid)
        ));
    }

    #[tokio::test]
    async fn deleting_account_invalidates_tokens() {
        let store = MemoryStore::new();
        let keys = keys();
        let mut user = seeded_user(&store).await;
        let token = issue(&store, &keys, &mut user).await.expect("issued");

        store.delete(user.id).await.expect("deleted");

        assert!(matches!(
            verify(&store, &keys, &token).await,
            Err(TokenError::Invalid)
        ));
    }
}
