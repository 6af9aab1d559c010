//! Forum Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, joined views, repository traits
//! - `application/` - Topic, thread and post services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Rules
//! - Topics are opened by admin-group members only
//! - A post's author is always the authenticated user
//! - Only the author may update or delete a post
//! - Tags are created on first use, trimmed and lowercased

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use error::{ForumError, ForumResult};
pub use infra::postgres::PgForumRepository;
pub use presentation::router::{ForumState, forum_router};
