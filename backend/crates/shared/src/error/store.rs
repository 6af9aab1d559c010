//! Storage Error - what repositories report
//!
//! Repositories never interpret constraint violations themselves; they
//! surface the violated constraint's name so services can map it to a
//! field-specific domain error.

use thiserror::Error;

/// Repository result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by repository implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("unique constraint `{constraint}` violated")]
    UniqueViolation { constraint: String },

    /// A foreign key constraint rejected the write
    #[error("foreign key constraint `{constraint}` violated")]
    ForeignKeyViolation { constraint: String },

    /// A check constraint rejected the write
    #[error("check constraint `{constraint}` violated")]
    CheckViolation { constraint: String },

    /// Optimistic concurrency check failed: the row is gone or its
    /// version moved on since it was read
    #[error("row was modified or removed concurrently")]
    StaleWrite,

    /// The transactional session was already committed or rolled back
    #[error("session is closed")]
    SessionClosed,

    /// A persisted value could not be mapped back into the domain
    #[error("corrupt row: {0}")]
    Decode(String),

    /// Any other driver error
    #[cfg(feature = "sqlx")]
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// Name of the violated constraint, if this is a constraint violation
    pub fn constraint(&self) -> Option<&str> {
        match self {
            StoreError::UniqueViolation { constraint }
            | StoreError::ForeignKeyViolation { constraint }
            | StoreError::CheckViolation { constraint } => Some(constraint),
            _ => None,
        }
    }

    /// True if this is a unique violation on the given constraint
    pub fn is_unique_violation(&self, name: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint } if constraint == name)
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind as DbErrorKind;

        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            match db_err.kind() {
                DbErrorKind::UniqueViolation => return StoreError::UniqueViolation { constraint },
                DbErrorKind::ForeignKeyViolation => {
                    return StoreError::ForeignKeyViolation { constraint };
                }
                DbErrorKind::CheckViolation => return StoreError::CheckViolation { constraint },
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}
