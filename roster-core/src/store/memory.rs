//! In-memory store backend.
//!
//! Backs the test suite and deployments that run without a database.
//! Durability matches process lifetime; everything else behaves like the
//! Postgres backend, including write-time validation and email
//! uniqueness.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::credentials;
use crate::error::StoreError;
use crate::user::{NewUser, User};

use super::UserStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        new.validate()?;
        let email = new.normalized_email();

        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::EmailTaken);
        }

        let password_hash = credentials::hash_password(&new.password)
            .map_err(|_| StoreError::Credential)?;
        let user = new.into_user(password_hash);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.write().await.remove(&id))
    }
}
