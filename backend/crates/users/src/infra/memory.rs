//! In-memory repository used by the service tests

use kernel::error::store::StoreResult;
use kernel::id::{AdminGroupId, GroupId, UserId};
use kernel::memory::{MemoryTable, Record, UniqueIndex};
use kernel::page::Page;
use uuid::Uuid;

use crate::domain::entity::{
    group::{AdminGroup, Group},
    telegram::TelegramIntegration,
    user::User,
};
use crate::domain::repository::{
    AdminGroupRepository, GroupRepository, TelegramIntegrationRepository, UserRepository,
    constraint,
};
use crate::domain::value_object::{email::Email, username::Username};

impl Record for User {
    fn key(&self) -> Uuid {
        self.user_id.into_uuid()
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn version_mut(&mut self) -> &mut i32 {
        &mut self.version
    }
}

impl Record for Group {
    fn key(&self) -> Uuid {
        self.group_id.into_uuid()
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn version_mut(&mut self) -> &mut i32 {
        &mut self.version
    }
}

impl Record for AdminGroup {
    fn key(&self) -> Uuid {
        self.admin_group_id.into_uuid()
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn version_mut(&mut self) -> &mut i32 {
        &mut self.version
    }
}

impl Record for TelegramIntegration {
    fn key(&self) -> Uuid {
        self.user_id.into_uuid()
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn version_mut(&mut self) -> &mut i32 {
        &mut self.version
    }
}

/// Tables mirroring the users schema, including its unique constraints
#[derive(Clone)]
pub struct MemoryUsersRepository {
    users: MemoryTable<User>,
    groups: MemoryTable<Group>,
    admin_groups: MemoryTable<AdminGroup>,
    telegram: MemoryTable<TelegramIntegration>,
}

impl Default for MemoryUsersRepository {
    fn default() -> Self {
        Self {
            users: MemoryTable::new(vec![
                UniqueIndex::new(constraint::USERS_USERNAME_KEY, |u: &User| {
                    Some(u.username.as_str().to_string())
                }),
                UniqueIndex::new(constraint::USERS_EMAIL_KEY, |u: &User| {
                    Some(u.email.as_str().to_string())
                }),
            ]),
            groups: MemoryTable::new(vec![UniqueIndex::new(
                constraint::GROUPS_NAME_KEY,
                |g: &Group| Some(g.name.clone()),
            )]),
            admin_groups: MemoryTable::new(vec![UniqueIndex::new(
                constraint::ADMIN_GROUPS_NAME_KEY,
                |g: &AdminGroup| Some(g.name.clone()),
            )]),
            telegram: MemoryTable::new(vec![
                UniqueIndex::new(constraint::TELEGRAM_ID_KEY, |t: &TelegramIntegration| {
                    Some(t.telegram_id.to_string())
                }),
                UniqueIndex::new(
                    constraint::TELEGRAM_USERNAME_KEY,
                    |t: &TelegramIntegration| t.telegram_username.clone(),
                ),
            ]),
        }
    }
}

impl UserRepository for MemoryUsersRepository {
    async fn add(&self, user: &User) -> StoreResult<()> {
        self.users.insert(user.clone()).await
    }

    async fn update(&self, user: &mut User) -> StoreResult<()> {
        self.users.update(user).await
    }

    async fn get(&self, user_id: &UserId) -> StoreResult<Option<User>> {
        Ok(self.users.get(user_id.into_uuid()).await)
    }

    async fn get_by_username(&self, username: &Username) -> StoreResult<Option<User>> {
        Ok(self.users.find(|u| u.username == *username).await)
    }

    async fn get_by_email(&self, email: &Email) -> StoreResult<Option<User>> {
        Ok(self.users.find(|u| u.email == *email).await)
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<User>> {
        Ok(self.users.filter(|_| true, page).await)
    }

    async fn get_by_group(&self, group_id: &GroupId, page: Page) -> StoreResult<Vec<User>> {
        Ok(self
            .users
            .filter(|u| u.group_id == Some(*group_id), page)
            .await)
    }

    async fn get_by_admin_group(
        &self,
        admin_group_id: &AdminGroupId,
        page: Page,
    ) -> StoreResult<Vec<User>> {
        Ok(self
            .users
            .filter(|u| u.admin_group_id == Some(*admin_group_id), page)
            .await)
    }

    async fn delete(&self, user_id: &UserId) -> StoreResult<bool> {
        // Telegram rows cascade with their user
        self.telegram.remove(user_id.into_uuid()).await;
        Ok(self.users.remove(user_id.into_uuid()).await)
    }
}

impl GroupRepository for MemoryUsersRepository {
    async fn add(&self, group: &Group) -> StoreResult<()> {
        self.groups.insert(group.clone()).await
    }

    async fn update(&self, group: &mut Group) -> StoreResult<()> {
        self.groups.update(group).await
    }

    async fn get(&self, group_id: &GroupId) -> StoreResult<Option<Group>> {
        Ok(self.groups.get(group_id.into_uuid()).await)
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Group>> {
        Ok(self.groups.find(|g| g.name == name).await)
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Group>> {
        Ok(self.groups.filter(|_| true, page).await)
    }

    async fn delete(&self, group_id: &GroupId) -> StoreResult<bool> {
        Ok(self.groups.remove(group_id.into_uuid()).await)
    }
}

impl AdminGroupRepository for MemoryUsersRepository {
    async fn add(&self, group: &AdminGroup) -> StoreResult<()> {
        self.admin_groups.insert(group.clone()).await
    }

    async fn update(&self, group: &mut AdminGroup) -> StoreResult<()> {
        self.admin_groups.update(group).await
    }

    async fn get(&self, admin_group_id: &AdminGroupId) -> StoreResult<Option<AdminGroup>> {
        Ok(self.admin_groups.get(admin_group_id.into_uuid()).await)
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<AdminGroup>> {
        Ok(self.admin_groups.find(|g| g.name == name).await)
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<AdminGroup>> {
        Ok(self.admin_groups.filter(|_| true, page).await)
    }

    async fn delete(&self, admin_group_id: &AdminGroupId) -> StoreResult<bool> {
        Ok(self.admin_groups.remove(admin_group_id.into_uuid()).await)
    }
}

impl TelegramIntegrationRepository for MemoryUsersRepository {
    async fn add(&self, integration: &TelegramIntegration) -> StoreResult<()> {
        self.telegram.insert(integration.clone()).await
    }

    async fn update(&self, integration: &mut TelegramIntegration) -> StoreResult<()> {
        self.telegram.update(integration).await
    }

    async fn get(&self, user_id: &UserId) -> StoreResult<Option<TelegramIntegration>> {
        Ok(self.telegram.get(user_id.into_uuid()).await)
    }

    async fn get_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> StoreResult<Option<TelegramIntegration>> {
        Ok(self.telegram.find(|t| t.telegram_id == telegram_id).await)
    }

    async fn delete(&self, user_id: &UserId) -> StoreResult<bool> {
        Ok(self.telegram.remove(user_id.into_uuid()).await)
    }
}
