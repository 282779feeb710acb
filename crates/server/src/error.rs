//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures unexpected errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; error responses are JSON bodies of the form
//! `{"error": "<message>"}` and never leak internal details.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::media::MediaError;
use crate::services::token::TokenError;

/// Application-level error type for the content API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Media store operation failed or was rejected.
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Missing or invalid input fields.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing, invalid or expired bearer token, or the token references a
    /// since-removed administrator.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Email not on the admin allow-list.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Referenced article/project does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upload exceeds the size limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        // All verification failures collapse into one message; the caller
        // must not be able to distinguish a bad signature from expiry.
        Self::Unauthenticated("Invalid or expired token".to_owned())
    }
}

impl AppError {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Media(err) => match err {
                MediaError::NotAnImage => StatusCode::BAD_REQUEST,
                MediaError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                MediaError::Upload(_) | MediaError::Transport(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Client-facing message. Internal failures get a generic message.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Media(err) => match err {
                MediaError::NotAnImage => "Only image files are allowed".to_owned(),
                MediaError::TooLarge { limit, .. } => {
                    format!("Image exceeds the {} MiB upload limit", limit / (1024 * 1024))
                }
                MediaError::Upload(_) | MediaError::Transport(_) => {
                    "Internal server error".to_owned()
                }
            },
            Self::BadRequest(msg)
            | Self::Unauthenticated(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
            Self::PayloadTooLarge => "Payload too large".to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry; client errors are just traced.
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = Json(json!({ "error": self.client_message() }));
        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::BadRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Unauthenticated("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Forbidden("x".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(AppError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::PayloadTooLarge),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of(AppError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_media_error_statuses() {
        assert_eq!(
            status_of(AppError::Media(MediaError::NotAnImage)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Media(MediaError::TooLarge {
                size: 10_000_000,
                limit: 5 * 1024 * 1024,
            })),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of(AppError::Media(MediaError::Upload("boom".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_do_not_leak() {
        let err = AppError::Internal("connection string postgres://user:pw@host".into());
        assert_eq!(err.client_message(), "Internal server error");

        let err = AppError::Media(MediaError::Upload("api key rejected".into()));
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = AppError::NotFound("News article not found".into());
        assert_eq!(err.client_message(), "News article not found");

        let err = AppError::Media(MediaError::NotAnImage);
        assert_eq!(err.client_message(), "Only image files are allowed");
    }

    #[test]
    fn test_token_error_collapses_to_unauthenticated() {
        let err: AppError = TokenError::Verification.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.client_message(), "Invalid or expired token");
    }
}
