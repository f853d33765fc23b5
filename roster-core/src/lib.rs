//! Core library for the Roster account service.
//!
//! Holds everything that is independent of the HTTP surface: the user
//! domain model and its write-time validation, credential hashing, the
//! [`store::UserStore`] port with its in-memory and Postgres
//! implementations, and the [`mailer::Mailer`] port for signup
//! notifications.

pub mod credentials;
pub mod error;
pub mod mailer;
pub mod store;
pub mod user;

pub use error::StoreError;
pub use user::{NewUser, User, UserUpdate};

/// Embedded migrations for the Postgres store backend.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
