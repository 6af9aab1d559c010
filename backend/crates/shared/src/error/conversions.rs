//! Error conversions - From implementations into [`AppError`]

use super::app_error::AppError;
use super::store::StoreError;

// ============================================================================
// Storage errors
// ============================================================================

impl AppError {
    /// Response error for a storage failure, without attaching the cause
    ///
    /// Lets domain errors that keep ownership of their `StoreError` share
    /// the kernel's status mapping.
    pub fn from_store(err: &StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { .. } => AppError::conflict("Duplicate key value"),
            StoreError::ForeignKeyViolation { .. } => {
                AppError::conflict("Referenced record does not exist or is still in use")
            }
            StoreError::CheckViolation { .. } => {
                AppError::bad_request("Check constraint violation")
            }
            StoreError::StaleWrite => AppError::conflict("Record was modified concurrently")
                .with_action("Reload the record and retry"),
            StoreError::SessionClosed | StoreError::Decode(_) => {
                AppError::internal("Database error")
            }
            #[cfg(feature = "sqlx")]
            StoreError::Database(db) => match db {
                sqlx::Error::PoolTimedOut => {
                    AppError::service_unavailable("Database connection pool exhausted")
                }
                sqlx::Error::Io(_) => AppError::service_unavailable("Database connection error"),
                _ => AppError::internal("Database error"),
            },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::from_store(&err).with_source(err)
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::from(err).into()
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        if self.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}
