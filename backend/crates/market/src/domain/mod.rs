//! Domain Layer
//!
//! Contains entities, value objects, payment descriptors and repository
//! traits.

pub mod entity;
pub mod payment;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{cart::ProductCart, currency::Currency, product::Product, shop::Shop};
pub use payment::{
    Confirmation, CustomerDetails, LineItem, LineItemList, PaymentError, PaymentGateway,
    PaymentRequest, Priceable,
};
pub use repository::{CartRepository, CurrencyRepository, ProductRepository, ShopRepository};
