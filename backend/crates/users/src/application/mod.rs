//! Application Layer
//!
//! Services orchestrating the repositories.

pub mod auth;
pub mod config;
pub mod telegram_link;
pub mod user_service;

// Re-exports
pub use auth::AuthService;
pub use config::UsersConfig;
pub use telegram_link::{LinkTelegramInput, TelegramLinkService};
pub use user_service::{CreateUserInput, UpdateUserInput, UserService};
