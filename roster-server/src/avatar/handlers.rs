//! Avatar upload, retrieval, and deletion.

use axum::{
    Extension,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;

use roster_core::User;

use super::pipeline::{self, AVATAR_CONTENT_TYPE, UploadError};
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(mut user): Extension<User>,
    mut multipart: Multipart,
) -> AppResult<StatusCode> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?
    {
        if field.name() != Some("avatar") {
            continue;
        }
        let filename = field.file_name().map(str::to_owned);
        let data = field
            .bytes()
            .await
            .map_err(|err| AppError::bad_request(err.to_string()))?;

        pipeline::validate_upload(filename.as_deref(), data.len())?;
        upload = Some(data.to_vec());
        break;
    }
    let bytes = upload.ok_or(UploadError::MissingField)?;

    user.avatar = Some(pipeline::normalize(bytes).await?);
    user.updated_at = Utc::now();
    state.store.save(&user).await?;

    Ok(StatusCode::OK)
}

/// Serve the stored blob as it is, with a fixed content type. An account
/// without an avatar is a 404, distinct from store failures (500).
pub async fn get_avatar(
    Extension(user): Extension<User>,
) -> AppResult<impl IntoResponse> {
    let bytes = user
        .avatar
        .ok_or_else(|| AppError::not_found("No avatar set"))?;

    Ok(([(header::CONTENT_TYPE, AVATAR_CONTENT_TYPE)], bytes))
}

pub async fn delete_avatar(
    State(state): State<AppState>,
    Extension(mut user): Extension<User>,
) -> AppResult<StatusCode> {
    user.avatar = None;
    user.updated_at = Utc::now();
    state.store.save(&user).await?;

    Ok(StatusCode::OK)
}
