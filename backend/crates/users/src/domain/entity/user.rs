//! User Entity

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppResult;
use kernel::id::{AdminGroupId, GroupId, UserId};
use platform::password::HashingPolicy;

use crate::domain::value_object::{
    email::Email,
    gender::Gender,
    user_password::{RawPassword, UserPassword},
    username::Username,
};

/// User entity
///
/// The password hash is write-only: outside this crate a user can only be
/// given a new password or asked to verify one.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Login handle (unique)
    pub username: Username,
    /// Contact address (unique)
    pub email: Email,
    pub(crate) password: UserPassword,
    pub gender: Gender,
    pub group_id: Option<GroupId>,
    /// Membership in an admin group grants topic creation
    pub admin_group_id: Option<AdminGroupId>,
    /// Optimistic concurrency counter
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(username: Username, email: Email, password: UserPassword, gender: Gender) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            username,
            email,
            password,
            gender,
            group_id: None,
            admin_group_id: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the password hash
    pub fn set_password(&mut self, raw: &RawPassword, policy: &HashingPolicy) -> AppResult<()> {
        self.password = UserPassword::from_raw(raw, policy)?;
        self.touch();
        Ok(())
    }

    /// Check a candidate password against the stored hash
    pub fn verify_password(&self, raw: &RawPassword, policy: &HashingPolicy) -> bool {
        self.password.verify(raw, policy)
    }

    /// True when the stored hash predates the current hashing policy
    pub fn password_needs_rehash(&self, policy: &HashingPolicy) -> bool {
        self.password.needs_rehash(policy)
    }

    pub fn set_username(&mut self, username: Username) {
        self.username = username;
        self.touch();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.touch();
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = gender;
        self.touch();
    }

    pub fn set_group(&mut self, group_id: Option<GroupId>) {
        self.group_id = group_id;
        self.touch();
    }

    pub fn set_admin_group(&mut self, admin_group_id: Option<AdminGroupId>) {
        self.admin_group_id = admin_group_id;
        self.touch();
    }

    /// Member of any admin group
    pub fn is_admin(&self) -> bool {
        self.admin_group_id.is_some()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
