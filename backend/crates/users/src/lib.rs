//! Users Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Authentication and user self-service
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Account creation with unique username and email
//! - Username + password login returning a signed bearer token
//! - Self-service profile update and deletion
//! - Groups and admin groups
//! - Optional Telegram account link
//!
//! ## Security Model
//! - Passwords hashed with Argon2 (variant and salt length configurable)
//! - Password hashes are write-only outside the persistence layer
//! - Every mutation checks the acting user inside the service

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::UsersConfig;
pub use domain::entity::user::User;
pub use error::{UserError, UserResult};
pub use infra::postgres::PgUsersRepository;
pub use presentation::auth::authenticate;
pub use presentation::router::{UsersState, users_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
