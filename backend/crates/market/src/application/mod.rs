//! Application Layer
//!
//! Services orchestrating the market repositories.

pub mod cart_service;
pub mod shop_service;

// Re-exports
pub use cart_service::{CartService, CartSummary};
pub use shop_service::{NewProductInput, OpenShopInput, ShopService, UpdateProductInput};
