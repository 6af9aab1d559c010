//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    group::{AdminGroup, Group},
    telegram::TelegramIntegration,
    user::User,
};
pub use repository::{
    AdminGroupRepository, GroupRepository, TelegramIntegrationRepository, UserRepository,
};
