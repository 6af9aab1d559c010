//! Forum Error Types
//!
//! Forum-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind, store::StoreError};
use thiserror::Error;
use users::UserError;

/// Forum-specific result type alias
pub type ForumResult<T> = Result<T, ForumError>;

/// Forum-specific error variants
#[derive(Debug, Error)]
pub enum ForumError {
    #[error("Topic not found")]
    TopicNotFound,

    #[error("Thread not found")]
    ThreadNotFound,

    #[error("Post not found")]
    PostNotFound,

    /// Topic symbol already in use
    #[error("Topic symbol already exists")]
    SymbolTaken,

    /// Acting user is not the author, or not an admin for topic creation
    #[error("Not allowed to modify this resource")]
    Unauthorized,

    /// Input rejected before any write
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Row changed since it was read
    #[error("Resource was modified concurrently")]
    Conflict,

    /// Resolving the acting user failed
    #[error(transparent)]
    User(#[from] UserError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(StoreError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ForumError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForumError::TopicNotFound | ForumError::ThreadNotFound | ForumError::PostNotFound => {
                ErrorKind::NotFound
            }
            ForumError::SymbolTaken | ForumError::Conflict => ErrorKind::Conflict,
            ForumError::Unauthorized => ErrorKind::Forbidden,
            ForumError::Validation(_) => ErrorKind::BadRequest,
            ForumError::User(e) => e.kind(),
            ForumError::Store(e) => AppError::from_store(e).kind(),
            ForumError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            ForumError::User(e) => e.to_app_error(),
            ForumError::Store(e) => AppError::from_store(e),
            ForumError::SymbolTaken => AppError::new(self.kind(), self.to_string())
                .with_action("Choose a different symbol"),
            ForumError::Conflict => AppError::new(self.kind(), self.to_string())
                .with_action("Reload the record and retry"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ForumError::Store(e) if self.kind().is_server_error() => {
                tracing::error!(error = %e, "Forum storage error");
            }
            ForumError::Internal(msg) => {
                tracing::error!(message = %msg, "Forum internal error");
            }
            ForumError::User(e) if e.kind() == ErrorKind::Unauthorized => {
                tracing::warn!(error = %e, "Unauthenticated forum request");
            }
            ForumError::Unauthorized => {
                tracing::warn!("Forum action by a user who may not perform it");
            }
            _ => {
                tracing::debug!(error = %self, "Forum error");
            }
        }
    }
}

impl IntoResponse for ForumError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<StoreError> for ForumError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StaleWrite => ForumError::Conflict,
            other => ForumError::Store(other),
        }
    }
}

/// Value objects report validation failures as `AppError`
impl From<AppError> for ForumError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                ForumError::Validation(err.message().to_string())
            }
            _ => ForumError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_is_forbidden() {
        assert_eq!(ForumError::Unauthorized.kind(), ErrorKind::Forbidden);
        assert_eq!(ForumError::Unauthorized.to_app_error().status_code(), 403);
    }

    #[test]
    fn test_user_errors_keep_their_kind() {
        let err = ForumError::from(UserError::Unauthenticated);
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_stale_write_becomes_conflict() {
        assert!(matches!(
            ForumError::from(StoreError::StaleWrite),
            ForumError::Conflict
        ));
    }
}
