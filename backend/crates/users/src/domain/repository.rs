//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer and report constraint violations by name.

use kernel::error::store::StoreResult;
use kernel::id::{AdminGroupId, GroupId, UserId};
use kernel::page::Page;

use crate::domain::entity::{
    group::{AdminGroup, Group},
    telegram::TelegramIntegration,
    user::User,
};
use crate::domain::value_object::{email::Email, username::Username};

/// Unique constraint names shared by the schema and the services
pub mod constraint {
    pub const USERS_USERNAME_KEY: &str = "users_username_key";
    pub const USERS_EMAIL_KEY: &str = "users_email_key";
    pub const GROUPS_NAME_KEY: &str = "groups_name_key";
    pub const ADMIN_GROUPS_NAME_KEY: &str = "admin_groups_name_key";
    pub const TELEGRAM_ID_KEY: &str = "telegram_integrations_telegram_id_key";
    pub const TELEGRAM_USERNAME_KEY: &str = "telegram_integrations_telegram_username_key";
}

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user
    async fn add(&self, user: &User) -> StoreResult<()>;

    /// Write back mutated fields; bumps `user.version` on success
    async fn update(&self, user: &mut User) -> StoreResult<()>;

    async fn get(&self, user_id: &UserId) -> StoreResult<Option<User>>;

    async fn get_by_username(&self, username: &Username) -> StoreResult<Option<User>>;

    async fn get_by_email(&self, email: &Email) -> StoreResult<Option<User>>;

    async fn get_all(&self, page: Page) -> StoreResult<Vec<User>>;

    /// Members of a group
    async fn get_by_group(&self, group_id: &GroupId, page: Page) -> StoreResult<Vec<User>>;

    /// Members of an admin group
    async fn get_by_admin_group(
        &self,
        admin_group_id: &AdminGroupId,
        page: Page,
    ) -> StoreResult<Vec<User>>;

    /// Physically remove; returns whether a row was removed
    async fn delete(&self, user_id: &UserId) -> StoreResult<bool>;
}

/// Group repository trait
#[trait_variant::make(GroupRepository: Send)]
pub trait LocalGroupRepository {
    async fn add(&self, group: &Group) -> StoreResult<()>;

    async fn update(&self, group: &mut Group) -> StoreResult<()>;

    async fn get(&self, group_id: &GroupId) -> StoreResult<Option<Group>>;

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Group>>;

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Group>>;

    async fn delete(&self, group_id: &GroupId) -> StoreResult<bool>;
}

/// Admin group repository trait
#[trait_variant::make(AdminGroupRepository: Send)]
pub trait LocalAdminGroupRepository {
    async fn add(&self, group: &AdminGroup) -> StoreResult<()>;

    async fn update(&self, group: &mut AdminGroup) -> StoreResult<()>;

    async fn get(&self, admin_group_id: &AdminGroupId) -> StoreResult<Option<AdminGroup>>;

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<AdminGroup>>;

    async fn get_all(&self, page: Page) -> StoreResult<Vec<AdminGroup>>;

    async fn delete(&self, admin_group_id: &AdminGroupId) -> StoreResult<bool>;
}

/// Telegram integration repository trait
#[trait_variant::make(TelegramIntegrationRepository: Send)]
pub trait LocalTelegramIntegrationRepository {
    async fn add(&self, integration: &TelegramIntegration) -> StoreResult<()>;

    async fn update(&self, integration: &mut TelegramIntegration) -> StoreResult<()>;

    /// Integration of a user
    async fn get(&self, user_id: &UserId) -> StoreResult<Option<TelegramIntegration>>;

    async fn get_by_telegram_id(&self, telegram_id: i64)
    -> StoreResult<Option<TelegramIntegration>>;

    async fn delete(&self, user_id: &UserId) -> StoreResult<bool>;
}
