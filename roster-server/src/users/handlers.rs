//! Account lifecycle handlers.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use uuid::Uuid;

use roster_core::{
    NewUser, User, UserUpdate, credentials,
    user::LoginRequest,
};

use super::auth::{SessionToken, tokens};
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Login and registration both answer with the account and a fresh
/// bearer token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<NewUser>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let mut user = state.store.create(request).await?;

    // Fire-and-forget: a failed or slow notification must never fail
    // the registration response.
    let mailer = state.mailer.clone();
    let (email, name) = (user.email.clone(), user.name.clone());
    tokio::spawn(async move {
        if let Err(err) = mailer.send_welcome(&email, &name).await {
            tracing::warn!(error = %err, %email, "welcome notification failed");
        }
    });

    let token =
        tokens::issue(state.store.as_ref(), &state.token_keys, &mut user).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // Unknown email and wrong password take the same path out; the
    // response must not reveal which half was wrong.
    let mut user = state
        .store
        .find_by_email(&request.email.trim().to_lowercase())
        .await?
        .filter(|u| credentials::verify_password(&request.password, &u.password_hash))
        .ok_or_else(|| AppError::bad_request("Unable to login"))?;

    let token =
        tokens::issue(state.store.as_ref(), &state.token_keys, &mut user).await?;

    Ok(Json(AuthResponse { user, token }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(mut user): Extension<User>,
    Extension(SessionToken(session)): Extension<SessionToken>,
) -> AppResult<StatusCode> {
    tokens::revoke(state.store.as_ref(), &mut user, &session).await?;
    Ok(StatusCode::OK)
}

pub async fn logout_all(
    State(state): State<AppState>,
    Extension(mut user): Extension<User>,
) -> AppResult<StatusCode> {
    tokens::revoke_all(state.store.as_ref(), &mut user).await?;
    Ok(StatusCode::OK)
}

pub async fn me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<User>> {
    let user = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user))
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<User>> {
    // Parsed against the closed field set here rather than by the Json
    // extractor so an unknown key yields a 400, not a 422.
    let update: UserUpdate = serde_json::from_value(body)
        .map_err(|_| AppError::bad_request("Invalid update field"))?;

    let updated = state.store.apply_update(user.id, update).await?;
    Ok(Json(updated))
}

pub async fn delete_me(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<User>> {
    let deleted = state
        .store
        .delete(user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(deleted))
}
