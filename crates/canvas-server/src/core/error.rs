use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum Error {
    // Auth Errors
    #[error("No auth token found")]
    AuthFailNoToken,
    #[error("Auth token wrong format")]
    AuthFailTokenWrongFormat,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Auth context missing")]
    AuthFailCtxNotInRequestExt,
    #[error("Incorrect password")]
    InvalidCredentials,
    #[error("{0}")]
    Forbidden(&'static str),

    // Model Errors
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),

    // Store
    #[error("Store operation timed out")]
    StoreTimeout,
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    // Generic
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Stable machine-readable code sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Error::AuthFailNoToken | Error::AuthFailTokenWrongFormat | Error::InvalidToken => {
                "unauthorized"
            }
            Error::InvalidCredentials => "invalid_credentials",
            Error::Forbidden(_) => "forbidden",
            Error::Validation(_) => "validation_error",
            Error::Conflict(_) => "conflict",
            Error::NotFound(_) => "not_found",
            Error::StoreTimeout => "store_timeout",
            Error::AuthFailCtxNotInRequestExt | Error::Store(_) | Error::Internal(_) => {
                "internal_error"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::AuthFailNoToken
            | Error::AuthFailTokenWrongFormat
            | Error::InvalidToken
            | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::StoreTimeout => StatusCode::SERVICE_UNAVAILABLE,
            Error::AuthFailCtxNotInRequestExt | Error::Store(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        // Store and internal detail stays in the log.
        let error_message = match &self {
            Error::Store(_) | Error::Internal(_) | Error::AuthFailCtxNotInRequestExt => {
                error!("Request failed: {}", self);
                "Internal server error".to_string()
            }
            Error::StoreTimeout => {
                error!("Request failed: {}", self);
                "Service temporarily unavailable".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": error_message
            }
        }));

        (status, body).into_response()
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Error::Internal(format!("password hashing failed: {}", err))
    }
}
