//! Market Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, payment descriptors, repository traits
//! - `application/` - Shop and cart services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Rules
//! - A seller runs at most one shop; the seller is the authenticated user
//! - Only the shop's seller may add, change or remove its products
//! - Prices are non-negative decimals in an existing currency
//! - A cart is priced in a single currency

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use error::{MarketError, MarketResult};
pub use infra::postgres::PgMarketRepository;
pub use presentation::router::{MarketState, market_router};
