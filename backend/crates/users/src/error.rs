//! User Error Types
//!
//! User-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind, store::StoreError};
use thiserror::Error;

/// User-specific result type alias
pub type UserResult<T> = Result<T, UserError>;

/// User-specific error variants
#[derive(Debug, Error)]
pub enum UserError {
    /// User not found
    #[error("User not found")]
    NotFound,

    /// Group or admin group not found
    #[error("Group not found")]
    GroupNotFound,

    /// Username already exists
    #[error("Username already exists")]
    UsernameTaken,

    /// Email already exists
    #[error("Email already exists")]
    EmailTaken,

    /// Gender outside the allowed set
    #[error("Invalid gender `{0}`: expected one of male, female, other")]
    InvalidGender(String),

    /// Input rejected before any write
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Wrong username or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, invalid or expired token
    #[error("Authentication required")]
    Unauthenticated,

    /// Acting user may not touch the target
    #[error("Operation not permitted for this user")]
    Forbidden,

    /// Telegram account already linked to another user
    #[error("Telegram account is already linked")]
    TelegramAlreadyLinked,

    /// Row changed since it was read
    #[error("User was modified concurrently")]
    Conflict,

    /// Storage error
    #[error("Storage error: {0}")]
    Store(StoreError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl UserError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::NotFound | UserError::GroupNotFound => ErrorKind::NotFound,
            UserError::UsernameTaken
            | UserError::EmailTaken
            | UserError::TelegramAlreadyLinked
            | UserError::Conflict => ErrorKind::Conflict,
            UserError::InvalidGender(_) | UserError::Validation(_) => ErrorKind::BadRequest,
            UserError::InvalidCredentials | UserError::Unauthenticated => ErrorKind::Unauthorized,
            UserError::Forbidden => ErrorKind::Forbidden,
            UserError::Store(e) => AppError::from_store(e).kind(),
            UserError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            UserError::Store(e) => AppError::from_store(e),
            UserError::Conflict => AppError::new(self.kind(), self.to_string())
                .with_action("Reload the user and retry"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            UserError::Store(e) if self.kind().is_server_error() => {
                tracing::error!(error = %e, "User storage error");
            }
            UserError::Internal(msg) => {
                tracing::error!(message = %msg, "User internal error");
            }
            UserError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            UserError::Unauthenticated => {
                tracing::warn!("Request with invalid or expired token");
            }
            _ => {
                tracing::debug!(error = %self, "User error");
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StaleWrite => UserError::Conflict,
            other => UserError::Store(other),
        }
    }
}

/// Value objects report validation failures as `AppError`
impl From<AppError> for UserError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                UserError::Validation(err.message().to_string())
            }
            _ => UserError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(UserError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(UserError::UsernameTaken.kind(), ErrorKind::Conflict);
        assert_eq!(
            UserError::InvalidGender("x".to_string()).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(UserError::InvalidCredentials.kind(), ErrorKind::Unauthorized);
        assert_eq!(UserError::Forbidden.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_stale_write_becomes_conflict() {
        let err = UserError::from(StoreError::StaleWrite);
        assert!(matches!(err, UserError::Conflict));
        assert_eq!(err.to_app_error().action(), Some("Reload the user and retry"));
    }

    #[test]
    fn test_app_error_validation() {
        let err = UserError::from(AppError::bad_request("Email cannot be empty"));
        assert!(matches!(err, UserError::Validation(ref msg) if msg == "Email cannot be empty"));
    }

    #[test]
    fn test_store_error_kind_follows_kernel_mapping() {
        let err = UserError::from(StoreError::ForeignKeyViolation {
            constraint: "users_group_id_fkey".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }
}
