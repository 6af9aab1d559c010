//! User Service
//!
//! Account creation and self-service. Every mutation checks that the
//! acting user is the target.

use std::sync::Arc;

use kernel::error::store::StoreError;
use kernel::id::{GroupId, UserId};

use crate::application::config::UsersConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{UserRepository, constraint};
use crate::domain::value_object::{
    email::Email,
    gender::Gender,
    user_password::{RawPassword, UserPassword},
    username::Username,
};
use crate::error::{UserError, UserResult};

/// Create user input
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    /// `male`, `female` or `other`; `other` when absent
    pub gender: Option<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Default)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub gender: Option<String>,
    /// `Some(None)` leaves the group
    pub group_id: Option<Option<GroupId>>,
    /// Reject the update unless the stored version still matches
    pub expected_version: Option<i32>,
}

/// Map a unique violation to the field it concerns
fn user_conflict(err: StoreError) -> UserError {
    if err.is_unique_violation(constraint::USERS_USERNAME_KEY) {
        return UserError::UsernameTaken;
    }
    if err.is_unique_violation(constraint::USERS_EMAIL_KEY) {
        return UserError::EmailTaken;
    }
    match err {
        StoreError::ForeignKeyViolation { .. } => UserError::GroupNotFound,
        other => other.into(),
    }
}

/// User service
pub struct UserService<U>
where
    U: UserRepository,
{
    users: Arc<U>,
    config: Arc<UsersConfig>,
}

impl<U> UserService<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, config: Arc<UsersConfig>) -> Self {
        Self { users, config }
    }

    /// Register a new account
    ///
    /// All fields are validated before anything is written; uniqueness is
    /// left to the storage constraints.
    pub async fn create_user(&self, input: CreateUserInput) -> UserResult<User> {
        let gender = Gender::parse_optional(input.gender.as_deref())?;
        let username = Username::new(&input.username)?;
        let email = Email::new(input.email)?;
        let raw = RawPassword::new(input.password)?;
        let password = UserPassword::from_raw(&raw, &self.config.hashing)?;

        let user = User::new(username, email, password, gender);
        self.users.add(&user).await.map_err(user_conflict)?;

        tracing::info!(
            user_id = %user.user_id,
            username = %user.username,
            "User created"
        );

        Ok(user)
    }

    pub async fn get_user(&self, user_id: &UserId) -> UserResult<User> {
        self.users.get(user_id).await?.ok_or(UserError::NotFound)
    }

    /// Apply the fields present in `input` to the actor's own account
    pub async fn update_user(
        &self,
        actor: &User,
        target: &UserId,
        input: UpdateUserInput,
    ) -> UserResult<User> {
        if actor.user_id != *target {
            return Err(UserError::Forbidden);
        }

        let mut user = self.get_user(target).await?;
        if input.expected_version.is_some_and(|v| v != user.version) {
            return Err(UserError::Conflict);
        }

        // Validate everything before mutating
        let gender = input.gender.as_deref().map(str::parse::<Gender>).transpose()?;
        let username = input.username.map(Username::new).transpose()?;
        let email = input.email.map(Email::new).transpose()?;
        let raw = input.password.map(RawPassword::new).transpose()?;

        if let Some(username) = username {
            user.set_username(username);
        }
        if let Some(email) = email {
            user.set_email(email);
        }
        if let Some(gender) = gender {
            user.set_gender(gender);
        }
        if let Some(raw) = raw {
            user.set_password(&raw, &self.config.hashing)?;
        }
        if let Some(group_id) = input.group_id {
            user.set_group(group_id);
        }

        self.users.update(&mut user).await.map_err(user_conflict)?;

        tracing::info!(user_id = %user.user_id, version = user.version, "User updated");

        Ok(user)
    }

    /// Remove the actor's own account
    pub async fn delete_user(&self, actor: &User, target: &UserId) -> UserResult<()> {
        if actor.user_id != *target {
            return Err(UserError::Forbidden);
        }

        if !self.users.delete(target).await? {
            return Err(UserError::NotFound);
        }

        tracing::info!(user_id = %target, "User deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_conflict_mapping() {
        let username = StoreError::UniqueViolation {
            constraint: constraint::USERS_USERNAME_KEY.to_string(),
        };
        assert!(matches!(user_conflict(username), UserError::UsernameTaken));

        let email = StoreError::UniqueViolation {
            constraint: constraint::USERS_EMAIL_KEY.to_string(),
        };
        assert!(matches!(user_conflict(email), UserError::EmailTaken));

        let fk = StoreError::ForeignKeyViolation {
            constraint: "users_group_id_fkey".to_string(),
        };
        assert!(matches!(user_conflict(fk), UserError::GroupNotFound));

        assert!(matches!(user_conflict(StoreError::StaleWrite), UserError::Conflict));
    }
}
