//! PostgreSQL Repository Implementations
//!
//! Every statement runs on the request's [`PgSession`], so writes are
//! visible to later reads of the same request before commit.

use chrono::{DateTime, Utc};
use kernel::error::store::{StoreError, StoreResult};
use kernel::id::{AdminGroupId, GroupId, UserId};
use kernel::page::Page;
use kernel::session::PgSession;
use uuid::Uuid;

use crate::domain::entity::{
    group::{AdminGroup, Group},
    telegram::TelegramIntegration,
    user::User,
};
use crate::domain::repository::{
    AdminGroupRepository, GroupRepository, TelegramIntegrationRepository, UserRepository,
};
use crate::domain::value_object::{
    email::Email, user_password::UserPassword, username::Username,
};

macro_rules! select_users {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT
                user_id,
                username,
                email,
                password_hash,
                gender,
                group_id,
                admin_group_id,
                version,
                created_at,
                updated_at
            FROM users
            "#,
            $tail
        )
    };
}

macro_rules! select_groups {
    ($table:literal, $id:literal, $tail:literal) => {
        concat!(
            "SELECT ",
            $id,
            " AS id, name, description, version, created_at, updated_at FROM ",
            $table,
            " ",
            $tail
        )
    };
}

macro_rules! select_telegram {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT
                user_id,
                telegram_username,
                telegram_id,
                first_name,
                last_name,
                version,
                created_at,
                updated_at
            FROM telegram_integrations
            "#,
            $tail
        )
    };
}

/// Zero affected rows on a version-guarded write means the row moved on
fn ensure_written(rows_affected: u64) -> StoreResult<()> {
    if rows_affected == 0 {
        Err(StoreError::StaleWrite)
    } else {
        Ok(())
    }
}

/// PostgreSQL-backed users repository
#[derive(Clone)]
pub struct PgUsersRepository {
    session: PgSession,
}

impl PgUsersRepository {
    pub fn new(session: PgSession) -> Self {
        Self { session }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUsersRepository {
    async fn add(&self, user: &User) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                username,
                email,
                password_hash,
                gender,
                group_id,
                admin_group_id,
                version,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.gender.as_str())
        .bind(user.group_id.map(GroupId::into_uuid))
        .bind(user.admin_group_id.map(AdminGroupId::into_uuid))
        .bind(user.version)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn update(&self, user: &mut User) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = $3,
                email = $4,
                password_hash = $5,
                gender = $6,
                group_id = $7,
                admin_group_id = $8,
                updated_at = $9,
                version = version + 1
            WHERE user_id = $1 AND version = $2
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.version)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.gender.as_str())
        .bind(user.group_id.map(GroupId::into_uuid))
        .bind(user.admin_group_id.map(AdminGroupId::into_uuid))
        .bind(user.updated_at)
        .execute(session.conn()?)
        .await?;

        ensure_written(result.rows_affected())?;
        user.version += 1;
        Ok(())
    }

    async fn get(&self, user_id: &UserId) -> StoreResult<Option<User>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, UserRow>(select_users!("WHERE user_id = $1"))
            .bind(user_id.as_uuid())
            .fetch_optional(session.conn()?)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn get_by_username(&self, username: &Username) -> StoreResult<Option<User>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, UserRow>(select_users!("WHERE username = $1"))
            .bind(username.as_str())
            .fetch_optional(session.conn()?)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn get_by_email(&self, email: &Email) -> StoreResult<Option<User>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, UserRow>(select_users!("WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(session.conn()?)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<User>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, UserRow>(select_users!(
            "ORDER BY created_at, user_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn get_by_group(&self, group_id: &GroupId, page: Page) -> StoreResult<Vec<User>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, UserRow>(select_users!(
            "WHERE group_id = $1 ORDER BY created_at, user_id LIMIT $2 OFFSET $3"
        ))
        .bind(group_id.as_uuid())
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn get_by_admin_group(
        &self,
        admin_group_id: &AdminGroupId,
        page: Page,
    ) -> StoreResult<Vec<User>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, UserRow>(select_users!(
            "WHERE admin_group_id = $1 ORDER BY created_at, user_id LIMIT $2 OFFSET $3"
        ))
        .bind(admin_group_id.as_uuid())
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn delete(&self, user_id: &UserId) -> StoreResult<bool> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Group Repository Implementations
// ============================================================================

impl GroupRepository for PgUsersRepository {
    async fn add(&self, group: &Group) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO groups (group_id, name, description, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(group.group_id.as_uuid())
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.version)
        .bind(group.created_at)
        .bind(group.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn update(&self, group: &mut Group) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE groups SET
                name = $3,
                description = $4,
                updated_at = $5,
                version = version + 1
            WHERE group_id = $1 AND version = $2
            "#,
        )
        .bind(group.group_id.as_uuid())
        .bind(group.version)
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.updated_at)
        .execute(session.conn()?)
        .await?;

        ensure_written(result.rows_affected())?;
        group.version += 1;
        Ok(())
    }

    async fn get(&self, group_id: &GroupId) -> StoreResult<Option<Group>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, GroupRow>(select_groups!(
            "groups",
            "group_id",
            "WHERE group_id = $1"
        ))
        .bind(group_id.as_uuid())
        .fetch_optional(session.conn()?)
        .await?;

        Ok(row.map(GroupRow::into_group))
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Group>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, GroupRow>(select_groups!(
            "groups",
            "group_id",
            "WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(session.conn()?)
        .await?;

        Ok(row.map(GroupRow::into_group))
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Group>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, GroupRow>(select_groups!(
            "groups",
            "group_id",
            "ORDER BY created_at, group_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(GroupRow::into_group).collect())
    }

    async fn delete(&self, group_id: &GroupId) -> StoreResult<bool> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM groups WHERE group_id = $1")
            .bind(group_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl AdminGroupRepository for PgUsersRepository {
    async fn add(&self, group: &AdminGroup) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO admin_groups (admin_group_id, name, description, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(group.admin_group_id.as_uuid())
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.version)
        .bind(group.created_at)
        .bind(group.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn update(&self, group: &mut AdminGroup) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE admin_groups SET
                name = $3,
                description = $4,
                updated_at = $5,
                version = version + 1
            WHERE admin_group_id = $1 AND version = $2
            "#,
        )
        .bind(group.admin_group_id.as_uuid())
        .bind(group.version)
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.updated_at)
        .execute(session.conn()?)
        .await?;

        ensure_written(result.rows_affected())?;
        group.version += 1;
        Ok(())
    }

    async fn get(&self, admin_group_id: &AdminGroupId) -> StoreResult<Option<AdminGroup>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, GroupRow>(select_groups!(
            "admin_groups",
            "admin_group_id",
            "WHERE admin_group_id = $1"
        ))
        .bind(admin_group_id.as_uuid())
        .fetch_optional(session.conn()?)
        .await?;

        Ok(row.map(GroupRow::into_admin_group))
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<AdminGroup>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, GroupRow>(select_groups!(
            "admin_groups",
            "admin_group_id",
            "WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(session.conn()?)
        .await?;

        Ok(row.map(GroupRow::into_admin_group))
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<AdminGroup>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, GroupRow>(select_groups!(
            "admin_groups",
            "admin_group_id",
            "ORDER BY created_at, admin_group_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(GroupRow::into_admin_group).collect())
    }

    async fn delete(&self, admin_group_id: &AdminGroupId) -> StoreResult<bool> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM admin_groups WHERE admin_group_id = $1")
            .bind(admin_group_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Telegram Integration Repository Implementation
// ============================================================================

impl TelegramIntegrationRepository for PgUsersRepository {
    async fn add(&self, integration: &TelegramIntegration) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO telegram_integrations (
                user_id,
                telegram_username,
                telegram_id,
                first_name,
                last_name,
                version,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(integration.user_id.as_uuid())
        .bind(&integration.telegram_username)
        .bind(integration.telegram_id)
        .bind(&integration.first_name)
        .bind(&integration.last_name)
        .bind(integration.version)
        .bind(integration.created_at)
        .bind(integration.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn update(&self, integration: &mut TelegramIntegration) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE telegram_integrations SET
                telegram_username = $3,
                telegram_id = $4,
                first_name = $5,
                last_name = $6,
                updated_at = $7,
                version = version + 1
            WHERE user_id = $1 AND version = $2
            "#,
        )
        .bind(integration.user_id.as_uuid())
        .bind(integration.version)
        .bind(&integration.telegram_username)
        .bind(integration.telegram_id)
        .bind(&integration.first_name)
        .bind(&integration.last_name)
        .bind(integration.updated_at)
        .execute(session.conn()?)
        .await?;

        ensure_written(result.rows_affected())?;
        integration.version += 1;
        Ok(())
    }

    async fn get(&self, user_id: &UserId) -> StoreResult<Option<TelegramIntegration>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, TelegramRow>(select_telegram!("WHERE user_id = $1"))
            .bind(user_id.as_uuid())
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(TelegramRow::into_integration))
    }

    async fn get_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> StoreResult<Option<TelegramIntegration>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, TelegramRow>(select_telegram!("WHERE telegram_id = $1"))
            .bind(telegram_id)
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(TelegramRow::into_integration))
    }

    async fn delete(&self, user_id: &UserId) -> StoreResult<bool> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM telegram_integrations WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    gender: String,
    group_id: Option<Uuid>,
    admin_group_id: Option<Uuid>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> StoreResult<User> {
        let password = UserPassword::from_phc_string(self.password_hash)
            .map_err(|e| StoreError::Decode(format!("users.password_hash: {}", e.message())))?;
        let gender = self
            .gender
            .parse()
            .map_err(|_| StoreError::Decode(format!("users.gender: {}", self.gender)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            username: Username::from_db(self.username),
            email: Email::from_db(self.email),
            password,
            gender,
            group_id: self.group_id.map(GroupId::from_uuid),
            admin_group_id: self.admin_group_id.map(AdminGroupId::from_uuid),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GroupRow {
    fn into_group(self) -> Group {
        Group {
            group_id: GroupId::from_uuid(self.id),
            name: self.name,
            description: self.description,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn into_admin_group(self) -> AdminGroup {
        AdminGroup {
            admin_group_id: AdminGroupId::from_uuid(self.id),
            name: self.name,
            description: self.description,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TelegramRow {
    user_id: Uuid,
    telegram_username: Option<String>,
    telegram_id: i64,
    first_name: Option<String>,
    last_name: Option<String>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TelegramRow {
    fn into_integration(self) -> TelegramIntegration {
        TelegramIntegration {
            user_id: UserId::from_uuid(self.user_id),
            telegram_username: self.telegram_username,
            telegram_id: self.telegram_id,
            first_name: self.first_name,
            last_name: self.last_name,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::domain::repository::constraint::USERS_USERNAME_KEY;
    use crate::domain::value_object::{gender::Gender, user_password::RawPassword};
    use platform::password::HashingPolicy;

    fn user(name: &str) -> User {
        let policy = HashingPolicy::default().with_cost(1024, 1, 1).unwrap();
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        User::new(
            Username::new(name).unwrap(),
            Email::new(format!("{name}@example.com")).unwrap(),
            UserPassword::from_raw(&raw, &policy).unwrap(),
            Gender::Female,
        )
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn test_user_roundtrip_and_constraints(pool: PgPool) {
        let mut alice = user("alice");

        let session = PgSession::begin(&pool).await.unwrap();
        let repo = PgUsersRepository::new(session.clone());
        UserRepository::add(&repo, &alice).await.unwrap();
        let loaded = UserRepository::get(&repo, &alice.user_id).await.unwrap().unwrap();
        assert_eq!(loaded.username, alice.username);
        assert_eq!(loaded.gender, Gender::Female);
        session.commit().await.unwrap();

        let session = PgSession::begin(&pool).await.unwrap();
        let repo = PgUsersRepository::new(session.clone());
        let err = UserRepository::add(&repo, &user("alice")).await.unwrap_err();
        assert!(err.is_unique_violation(USERS_USERNAME_KEY));
        session.rollback().await.unwrap();

        let session = PgSession::begin(&pool).await.unwrap();
        let repo = PgUsersRepository::new(session.clone());
        let mut stale = alice.clone();
        UserRepository::update(&repo, &mut alice).await.unwrap();
        assert_eq!(alice.version, 2);
        assert!(matches!(
            UserRepository::update(&repo, &mut stale).await,
            Err(StoreError::StaleWrite)
        ));
    }
}
