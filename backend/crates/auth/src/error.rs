//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. The `Display` text of client errors is
//! exactly what the frontend receives as `message`; several are translation
//! keys (`changePassword.error`) rather than prose.

use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request failed validation; the message is sent as is
    #[error("{0}")]
    Validation(Cow<'static, str>),

    #[error("Email already in use")]
    EmailInUse,

    /// Superadmin create/update collided with an existing email
    #[error("User already exists")]
    UserExists,

    /// Unknown email or wrong password (indistinguishable on purpose)
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No refresh token provided")]
    MissingRefreshToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("No token provided")]
    MissingAccessToken,

    #[error("Invalid or expired token")]
    InvalidAccessToken,

    /// Role gate reached without an authenticated user
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Access denied")]
    AccessDenied,

    #[error("Invalid role")]
    InvalidRole,

    /// Missing record; the message differs per route
    #[error("{0}")]
    NotFound(&'static str),

    /// Rate limiter rejected the request; the key is a translation key
    #[error("{0}")]
    RateLimited(&'static str),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        AuthError::Validation(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_)
            | AuthError::EmailInUse
            | AuthError::UserExists
            | AuthError::InvalidCredentials
            | AuthError::InvalidRole => StatusCode::BAD_REQUEST,
            AuthError::MissingRefreshToken
            | AuthError::MissingAccessToken
            | AuthError::InvalidAccessToken
            | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::InvalidRefreshToken | AuthError::AccessDenied => StatusCode::FORBIDDEN,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::EmailInUse
            | AuthError::UserExists
            | AuthError::InvalidCredentials
            | AuthError::InvalidRole => ErrorKind::BadRequest,
            AuthError::MissingRefreshToken
            | AuthError::MissingAccessToken
            | AuthError::InvalidAccessToken
            | AuthError::Unauthorized => ErrorKind::Unauthorized,
            AuthError::InvalidRefreshToken | AuthError::AccessDenied => ErrorKind::Forbidden,
            AuthError::NotFound(_) => ErrorKind::NotFound,
            AuthError::RateLimited(_) => ErrorKind::TooManyRequests,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError; server-side details stay out of the message
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => AppError::internal("Server error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidRefreshToken => {
                tracing::warn!("Invalid refresh token presented");
            }
            AuthError::AccessDenied => {
                tracing::warn!("Role check denied access");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            AuthError::RateLimited(key) => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({ "error": key, "message": key })),
            )
                .into_response(),
            other => other.to_app_error().into_response(),
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                AuthError::Validation(Cow::Owned(err.message().to_string()))
            }
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = AuthError::validation("changePassword.error");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_app_error().message(), "changePassword.error");

        let err = AuthError::NotFound("profile.user_not_found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "profile.user_not_found");
    }

    #[test]
    fn test_server_errors_are_masked() {
        let err = AuthError::Internal("pool exploded".to_string());
        assert_eq!(err.to_app_error().message(), "Server error");
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
    }

    #[test]
    fn test_token_errors() {
        assert_eq!(
            AuthError::MissingRefreshToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidRefreshToken.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::InvalidAccessToken.to_string(),
            "Invalid or expired token"
        );
    }

    #[test]
    fn test_bad_request_app_error_becomes_validation() {
        let err: AuthError = AppError::bad_request("Invalid email format").into();
        assert!(matches!(err, AuthError::Validation(ref m) if m == "Invalid email format"));

        let err: AuthError = AppError::internal("boom").into();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
