//! Error types for lostfound-api
//!
//! Every error renders as `{"error": "<message>"}`. Internal failures are
//! logged with their cause and reported to the client with the generic
//! message attached by the handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Refused by the strict claim policy (409)
    #[error("{0}")]
    Conflict(String),

    /// Internal server error (500)
    ///
    /// `message` is what the client sees; `cause` only reaches the log.
    #[error("{message}: {cause}")]
    Internal { message: String, cause: String },
}

impl ApiError {
    /// Wrap an unexpected failure with the operation's client-facing message
    pub fn internal(message: &str, cause: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            message: message.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Conflict(msg) => msg,
            ApiError::Internal { message, cause } => {
                error!("{}: {}", message, cause);
                message
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
