//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::application::check_request::UnauthenticatedReason;
use crate::domain::value_object::email::EmailError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential missing, invalid or expired
    #[error("Unauthenticated: {0}")]
    Unauthenticated(UnauthenticatedReason),

    /// An endpoint that needs a browser session was called without one
    #[error("no {0} cookie provided")]
    MissingSession(String),

    /// Wrong email or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// OAuth2 client authentication failed
    #[error("invalid_client")]
    InvalidClient,

    #[error("unsupported_grant_type")]
    UnsupportedGrantType,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("User not found")]
    UserNotFound,

    /// Sign up with an email that already has an account
    #[error("user already exists")]
    EmailTaken,

    /// Signed-in user acting on another user's record
    #[error("Not the owner of this record")]
    NotOwner,

    /// Backing store unavailable or returned malformed data
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Client rotation could not complete; previous client left in place
    #[error("Client rotation failed: {0}")]
    RotationConflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Unauthenticated(_) | AuthError::InvalidCredentials | AuthError::NotOwner => {
                ErrorKind::Forbidden
            }
            AuthError::InvalidClient => ErrorKind::Unauthorized,
            AuthError::MissingSession(_)
            | AuthError::UnsupportedGrantType
            | AuthError::BadRequest(_) => ErrorKind::BadRequest,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::Storage(_) | AuthError::RotationConflict(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Whether this is one of the expected, user-facing denials
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            AuthError::Unauthenticated(_) | AuthError::InvalidCredentials
        )
    }

    /// Convert to AppError
    ///
    /// Denials and server-side failures carry a generic message only.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Unauthenticated(_) | AuthError::InvalidCredentials | AuthError::NotOwner => {
                AppError::forbidden("access denied")
            }
            AuthError::InvalidClient => AppError::unauthorized("invalid_client"),
            AuthError::EmailTaken => AppError::conflict("user already exists"),
            AuthError::Storage(_) | AuthError::RotationConflict(_) | AuthError::Internal(_) => {
                AppError::internal("internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Auth storage error");
            }
            AuthError::RotationConflict(msg) => {
                tracing::error!(message = %msg, "OAuth2 client rotation failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials | AuthError::InvalidClient | AuthError::NotOwner => {
                tracing::warn!(error = %self, "Rejected credentials");
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
        self.to_app_error().into_response()
    }
}

impl From<UnauthenticatedReason> for AuthError {
    fn from(reason: UnauthenticatedReason) -> Self {
        AuthError::Unauthenticated(reason)
    }
}

impl From<EmailError> for AuthError {
    fn from(err: EmailError) -> Self {
        AuthError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denials_are_403_without_detail() {
        let err = AuthError::Unauthenticated(UnauthenticatedReason::InvalidSession);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(err.is_denial());
        assert_eq!(err.to_app_error().message(), "access denied");
    }

    #[test]
    fn test_missing_session_message_names_cookie() {
        let err = AuthError::MissingSession("auth_session".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_app_error().message(), "no auth_session cookie provided");
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = AuthError::RotationConflict("insert failed: UNIQUE constraint".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_denial());
        assert_eq!(err.to_app_error().message(), "internal server error");

        let err = AuthError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
    }

    #[test]
    fn test_account_errors() {
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::EmailTaken.to_app_error().message(), "user already exists");

        let err = AuthError::NotOwner;
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_app_error().message(), "access denied");
    }

    #[test]
    fn test_oauth_errors() {
        assert_eq!(AuthError::InvalidClient.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidClient.to_app_error().message(), "invalid_client");
        assert_eq!(
            AuthError::UnsupportedGrantType.to_app_error().message(),
            "unsupported_grant_type"
        );
    }
}
