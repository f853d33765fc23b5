//! # Roster Server
//!
//! HTTP surface for the Roster account service.
//!
//! ## Overview
//!
//! - **Accounts**: registration, login, profile update and deletion
//! - **Sessions**: signed bearer tokens with per-device revocation and
//!   logout-everywhere
//! - **Avatars**: validated image uploads normalized to 250x250 PNG
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - PostgreSQL (or an in-memory fallback) for account storage
//! - Argon2id for credential hashing
//! - HS256-signed tokens cross-checked against a per-account session set

pub mod avatar;
pub mod infra;
pub mod routes;
pub mod users;
