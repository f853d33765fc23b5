use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use roster_core::StoreError;

use crate::avatar::pipeline::UploadError;
use crate::users::auth::tokens::TokenError;

pub type AppResult<T> = Result<T, AppError>;

/// Route-boundary error: a status code and a client-visible message.
/// Internal detail never crosses this boundary; backend failures are
/// logged where they occur and surface as opaque 500s.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(_) | StoreError::EmailTaken => {
                Self::bad_request(err.to_string())
            }
            StoreError::NotFound => Self::not_found(err.to_string()),
            StoreError::Database(inner) => {
                tracing::error!(error = %inner, "store operation failed");
                Self::internal("Storage failure")
            }
            StoreError::Credential => {
                tracing::error!("credential hashing failed");
                Self::internal("Storage failure")
            }
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => Self::unauthorized("Please authenticate"),
            TokenError::Sign(inner) => {
                tracing::error!(error = %inner, "token signing failed");
                Self::internal("Token issuance failed")
            }
            TokenError::Store(store) => store.into(),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Processing => {
                tracing::error!("avatar processing task failed");
                Self::internal("Image processing failed")
            }
            _ => Self::bad_request(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}
