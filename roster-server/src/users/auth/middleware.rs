//! Bearer-token gate for authenticated routes.
//!
//! The single place token validity is checked. On success the resolved
//! account and session digest are attached to the request's extensions;
//! downstream handlers take them via `Extension` and trust them
//! unconditionally. On failure the request short-circuits with 401 and
//! the downstream handler never runs.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use super::tokens;
use crate::infra::{app_state::AppState, errors::AppError};

/// Digest of the session token the current request authenticated with.
/// Logout uses it to revoke exactly this session.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;
    let (user, session) =
        tokens::verify(state.store.as_ref(), &state.token_keys, &token).await?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(SessionToken(session));
    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Result<String, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Please authenticate"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::to_owned)
        .ok_or_else(|| AppError::unauthorized("Please authenticate"))
}
