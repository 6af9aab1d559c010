//! Market Error Types
//!
//! Market-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind, store::StoreError};
use thiserror::Error;
use users::UserError;

use crate::domain::payment::PaymentError;

/// Market-specific result type alias
pub type MarketResult<T> = Result<T, MarketError>;

/// Market-specific error variants
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Shop not found")]
    ShopNotFound,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Currency not found")]
    CurrencyNotFound,

    #[error("Cart item not found")]
    CartItemNotFound,

    /// The seller already runs a shop
    #[error("Seller already has a shop")]
    ShopAlreadyOpen,

    /// Acting user does not own the shop or cart item
    #[error("Not the owner of this resource")]
    NotOwner,

    /// Cart mixes products priced in different currencies
    #[error("Cart contains products in different currencies")]
    CurrencyMismatch,

    #[error("Cart is empty")]
    EmptyCart,

    /// Input rejected before any write
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Row changed since it was read
    #[error("Resource was modified concurrently")]
    Conflict,

    #[error(transparent)]
    Payment(#[from] PaymentError),

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

impl MarketError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::ShopNotFound
            | MarketError::ProductNotFound
            | MarketError::CurrencyNotFound
            | MarketError::CartItemNotFound => ErrorKind::NotFound,
            MarketError::ShopAlreadyOpen | MarketError::Conflict => ErrorKind::Conflict,
            MarketError::NotOwner => ErrorKind::Forbidden,
            MarketError::CurrencyMismatch => ErrorKind::UnprocessableEntity,
            MarketError::EmptyCart | MarketError::Validation(_) => ErrorKind::BadRequest,
            MarketError::Payment(PaymentError::MissingPrice(_)) => ErrorKind::BadRequest,
            MarketError::Payment(PaymentError::AmountOverflow) => ErrorKind::UnprocessableEntity,
            MarketError::Payment(PaymentError::Gateway(_)) => ErrorKind::ServiceUnavailable,
            MarketError::User(e) => e.kind(),
            MarketError::Store(e) => AppError::from_store(e).kind(),
            MarketError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            MarketError::User(e) => e.to_app_error(),
            MarketError::Store(e) => AppError::from_store(e),
            MarketError::EmptyCart => AppError::new(self.kind(), self.to_string())
                .with_action("Add a product to the cart first"),
            MarketError::Conflict => AppError::new(self.kind(), self.to_string())
                .with_action("Reload the record and retry"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            MarketError::Store(e) if self.kind().is_server_error() => {
                tracing::error!(error = %e, "Market storage error");
            }
            MarketError::Payment(PaymentError::Gateway(msg)) => {
                tracing::error!(message = %msg, "Payment gateway failure");
            }
            MarketError::Internal(msg) => {
                tracing::error!(message = %msg, "Market internal error");
            }
            MarketError::User(e) if e.kind() == ErrorKind::Unauthorized => {
                tracing::warn!(error = %e, "Unauthenticated market request");
            }
            MarketError::NotOwner => {
                tracing::warn!("Market action by a user who does not own the resource");
            }
            _ => {
                tracing::debug!(error = %self, "Market error");
            }
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<StoreError> for MarketError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StaleWrite => MarketError::Conflict,
            other => MarketError::Store(other),
        }
    }
}

/// Value objects report validation failures as `AppError`
impl From<AppError> for MarketError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                MarketError::Validation(err.message().to_string())
            }
            _ => MarketError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(MarketError::NotOwner.kind(), ErrorKind::Forbidden);
        assert_eq!(MarketError::ShopAlreadyOpen.kind(), ErrorKind::Conflict);
        assert_eq!(MarketError::EmptyCart.kind(), ErrorKind::BadRequest);
        assert_eq!(
            MarketError::from(PaymentError::Gateway("down".to_string())).kind(),
            ErrorKind::ServiceUnavailable
        );
        assert_eq!(
            MarketError::from(PaymentError::AmountOverflow).kind(),
            ErrorKind::UnprocessableEntity
        );
    }

    #[test]
    fn test_price_check_violation_is_bad_request() {
        let err = MarketError::from(StoreError::CheckViolation {
            constraint: "products_price_check".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
}
