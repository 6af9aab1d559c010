//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the vocabulary every domain crate agrees on:
//! - Error types for responses ([`error::app_error::AppError`]) and storage ([`error::store::StoreError`])
//! - Typed entity identifiers
//! - Pagination
//! - The per-request transactional session (feature `sqlx`)
//! - In-memory tables used by test repositories (feature `memory`)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
    pub mod store;
}
pub mod id;
pub mod page;

#[cfg(feature = "sqlx")]
pub mod session;

#[cfg(feature = "memory")]
pub mod memory;
