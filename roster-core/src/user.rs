//! User accounts and profile management
//!
//! Core types for account registration, authentication, and profile
//! updates.
//!
//! ## Account lifecycle
//!
//! 1. **Registration**: an account is created from a [`NewUser`] payload
//! 2. **Login**: credentials are verified, and a signed bearer token is
//!    issued; its digest is appended to the account's session set
//! 3. **Profile updates**: applied through [`UserUpdate`], a closed field
//!    set validated before any mutation
//! 4. **Deletion**: removes the record; outstanding tokens fail
//!    verification once the account is gone
//!
//! ## Security
//!
//! - Passwords are hashed with Argon2id before they reach a store
//! - Bearer tokens are hashed with SHA-256 before persistence; the raw
//!   token never touches the store
//! - `password_hash`, `sessions`, and `avatar` are never serialized to
//!   clients

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::credentials;
use crate::error::StoreError;

/// Basic mailbox-shaped pattern. Deliverability is not our problem;
/// obviously malformed addresses are.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

/// A registered account.
///
/// The hashed credential, the active session set, and the avatar blob are
/// write-only from the API's perspective: they are skipped by serde so a
/// `User` can be returned to clients directly.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique account identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Unique email address, stored lowercase
    pub email: String,
    /// Argon2id password hash (never serialized)
    #[serde(skip)]
    pub password_hash: String,
    /// Age in years, non-negative, defaults to 0
    pub age: i64,
    /// Normalized avatar image, if one has been uploaded (never serialized)
    #[serde(skip)]
    pub avatar: Option<Vec<u8>>,
    /// SHA-256 digests of the account's active bearer tokens, in issue
    /// order (never serialized)
    #[serde(skip)]
    pub sessions: Vec<String>,
    /// Timestamp of account creation
    pub created_at: DateTime<Utc>,
    /// Timestamp of last profile update
    pub updated_at: DateTime<Utc>,
}

/// Registration payload
///
/// ```json
/// {
///   "name": "Alice Smith",
///   "email": "alice@example.com",
///   "password": "correct horse",
///   "age": 30
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: Option<i64>,
}

/// Login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update payload.
///
/// The field set is closed: a body carrying any key outside
/// {name, email, password, age} fails deserialization, so the whole
/// update is rejected before anything is mutated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<i64>,
}

/// Validation errors raised at the store's write path
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("Name must not be empty")]
    InvalidName,

    #[error("Email is invalid")]
    InvalidEmail,

    #[error("Password must be at least 7 characters")]
    PasswordTooShort,

    #[error("Password must not contain \"password\"")]
    PasswordForbidden,

    #[error("Age must be a non-negative number")]
    NegativeAge,
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidName);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 7 {
        return Err(ValidationError::PasswordTooShort);
    }
    if password.to_lowercase().contains("password") {
        return Err(ValidationError::PasswordForbidden);
    }
    Ok(())
}

pub fn validate_age(age: i64) -> Result<(), ValidationError> {
    if age < 0 {
        return Err(ValidationError::NegativeAge);
    }
    Ok(())
}

impl NewUser {
    /// Validate the registration payload. Run by every store's write path
    /// before a record is created.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        Ok(())
    }

    /// Normalized email: trimmed and lowercased, matching what the store
    /// indexes on.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// Build the account record. `password_hash` must already be hashed;
    /// stores obtain it via [`credentials::hash_password`].
    pub fn into_user(self, password_hash: String) -> User {
        let now = Utc::now();
        User {
            id: Uuid::now_v7(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password_hash,
            age: self.age.unwrap_or(0),
            avatar: None,
            sessions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl UserUpdate {
    /// Validate every present field. Nothing is mutated until all fields
    /// pass, so a rejected update leaves the account untouched.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref name) = self.name {
            validate_name(name)?;
        }
        if let Some(ref email) = self.email {
            validate_email(email)?;
        }
        if let Some(ref password) = self.password {
            validate_password(password)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        Ok(())
    }

    /// Normalized replacement email, when one is present.
    pub fn normalized_email(&self) -> Option<String> {
        self.email.as_ref().map(|e| e.trim().to_lowercase())
    }

    /// Apply the update to an account record. Validates first; a present
    /// password is re-hashed here so plaintext never reaches a store.
    pub fn apply_to(&self, user: &mut User) -> Result<(), StoreError> {
        self.validate()?;

        if let Some(ref name) = self.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = self.normalized_email() {
            user.email = email;
        }
        if let Some(ref password) = self.password {
            user.password_hash = credentials::hash_password(password)
                .map_err(|_| StoreError::Credential)?;
        }
        if let Some(age) = self.age {
            user.age = age;
        }
        user.updated_at = Utc::now();
        Ok(())
    }
}
