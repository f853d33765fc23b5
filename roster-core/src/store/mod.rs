//! The user store port.
//!
//! The service treats persistence as an external durable record store
//! keyed by account id, with email uniqueness enforced at the store.
//! Write-time validation (email format, password strength, non-negative
//! age) lives on this side of the port so every backend enforces the
//! same rules.
//!
//! Read-modify-write sequences composed from [`UserStore::get`] and
//! [`UserStore::save`] (token issue, logout, avatar writes) are not
//! atomic against concurrent requests for the same account. Concurrent
//! logout and token-issue can interleave; callers must not rely on
//! serializability here.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::user::{NewUser, User, UserUpdate};

/// Durable account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Validate and persist a new account. The payload's password is
    /// hashed on the way in; plaintext is never stored. Fails with
    /// [`StoreError::EmailTaken`] when the email is already registered.
    async fn create(&self, new: NewUser) -> Result<User, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Lookup by normalized (lowercase) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Whole-record write. Used for session-set and avatar mutations,
    /// which carry no client-supplied fields to validate.
    async fn save(&self, user: &User) -> Result<(), StoreError>;

    /// Delete an account, returning the removed record when it existed.
    async fn delete(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Validated field update. Rejection is atomic: a payload failing
    /// validation or uniqueness leaves the record untouched. A present
    /// password is re-hashed by this write path.
    async fn apply_update(
        &self,
        id: Uuid,
        update: UserUpdate,
    ) -> Result<User, StoreError> {
        let mut user = self.get(id).await?.ok_or(StoreError::NotFound)?;

        if let Some(email) = update.normalized_email()
            && email != user.email
            && let Some(existing) = self.find_by_email(&email).await?
            && existing.id != id
        {
            return Err(StoreError::EmailTaken);
        }

        update.apply_to(&mut user)?;
        self.save(&user).await?;
        Ok(user)
    }
}
