//! Store error taxonomy.

use crate::user::ValidationError;

/// Errors surfaced by a [`crate::store::UserStore`].
///
/// `Validation` and `EmailTaken` are client-correctable and map to 400 at
/// the route boundary; `NotFound` maps to 404; the rest are opaque
/// backend failures and map to 500.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Email is already in use")]
    EmailTaken,

    #[error("User not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("credential hashing failed")]
    Credential,
}
