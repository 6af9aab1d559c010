//! Group and AdminGroup Entities
//!
//! Users reference at most one of each through `users.group_id` and
//! `users.admin_group_id`.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{AdminGroupId, GroupId};

/// Maximum length for a group name (in characters)
pub const GROUP_NAME_MAX_LENGTH: usize = 255;

fn validate_name(name: String) -> AppResult<String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("Group name cannot be empty"));
    }
    if name.chars().count() > GROUP_NAME_MAX_LENGTH {
        return Err(AppError::bad_request(format!(
            "Group name must be at most {} characters",
            GROUP_NAME_MAX_LENGTH
        )));
    }
    Ok(name)
}

/// Regular user group
#[derive(Debug, Clone)]
pub struct Group {
    pub group_id: GroupId,
    /// Unique
    pub name: String,
    pub description: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn new(name: impl Into<String>, description: Option<String>) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            group_id: GroupId::new(),
            name: validate_name(name.into())?,
            description,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn rename(&mut self, name: impl Into<String>) -> AppResult<()> {
        self.name = validate_name(name.into())?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Group whose members administer the forum
#[derive(Debug, Clone)]
pub struct AdminGroup {
    pub admin_group_id: AdminGroupId,
    /// Unique
    pub name: String,
    pub description: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminGroup {
    pub fn new(name: impl Into<String>, description: Option<String>) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            admin_group_id: AdminGroupId::new(),
            name: validate_name(name.into())?,
            description,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn rename(&mut self, name: impl Into<String>) -> AppResult<()> {
        self.name = validate_name(name.into())?;
        self.updated_at = Utc::now();
        Ok(())
    }
}
