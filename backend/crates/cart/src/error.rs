//! Cart Error Types

use std::borrow::Cow;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type CartResult<T> = Result<T, CartError>;

pub const CART_ITEM_NOT_FOUND: &str = "Cart item not found";

#[derive(Debug, Error)]
pub enum CartError {
    /// Bad input; the message is sent as is
    #[error("{0}")]
    Validation(Cow<'static, str>),

    #[error("Cart item not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CartError {
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        CartError::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CartError::Validation(_) => StatusCode::BAD_REQUEST,
            CartError::NotFound => StatusCode::NOT_FOUND,
            CartError::Database(_) | CartError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::Validation(_) => ErrorKind::BadRequest,
            CartError::NotFound => ErrorKind::NotFound,
            CartError::Database(_) | CartError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            CartError::Database(_) | CartError::Internal(_) => AppError::internal("Server error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CartError::Database(e) => tracing::error!(error = %e, "Cart database error"),
            CartError::Internal(msg) => tracing::error!(message = %msg, "Cart internal error"),
            _ => tracing::debug!(error = %self, "Cart error"),
        }
    }
}

impl IntoResponse for CartError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for CartError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                CartError::Validation(Cow::Owned(err.message().to_string()))
            }
            ErrorKind::NotFound => CartError::NotFound,
            _ => CartError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CartError::validation("Invalid userId").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(CartError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(CartError::NotFound.to_string(), CART_ITEM_NOT_FOUND);
    }

    #[test]
    fn test_server_errors_are_masked() {
        let err = CartError::Internal("lock poisoned".to_string());
        assert_eq!(err.to_app_error().message(), "Server error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_id_becomes_validation() {
        let err: CartError = "nope"
            .parse::<kernel::id::UserId>()
            .map_err(CartError::from)
            .unwrap_err();
        assert!(matches!(err, CartError::Validation(_)));
    }
}
