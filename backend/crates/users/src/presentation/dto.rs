//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{AdminGroupId, GroupId, UserId};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::entity::{
    group::{AdminGroup, Group},
    telegram::TelegramIntegration,
    user::User,
};
use crate::domain::value_object::gender::Gender;

// ============================================================================
// Token
// ============================================================================

/// Login form (`application/x-www-form-urlencoded`)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(token: String) -> Self {
        Self {
            token,
            token_type: "bearer",
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// Create user request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub gender: Option<String>,
}

/// Update user request; omitted fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub gender: Option<String>,
    /// Absent: unchanged; `null`: leave the group
    #[serde(default, deserialize_with = "present")]
    pub group_id: Option<Option<GroupId>>,
    pub expected_version: Option<i32>,
}

/// Distinguish an explicit `null` from an absent field
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// User response (never carries the password hash)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub gender: Gender,
    pub group_id: Option<GroupId>,
    pub admin_group_id: Option<AdminGroupId>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            gender: user.gender,
            group_id: user.group_id,
            admin_group_id: user.admin_group_id,
            version: user.version,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ============================================================================
// Telegram
// ============================================================================

/// Link Telegram request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTelegramRequest {
    pub telegram_id: i64,
    pub telegram_username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramResponse {
    pub user_id: UserId,
    pub telegram_id: i64,
    pub telegram_username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub version: i32,
}

impl From<TelegramIntegration> for TelegramResponse {
    fn from(t: TelegramIntegration) -> Self {
        Self {
            user_id: t.user_id,
            telegram_id: t.telegram_id,
            telegram_username: t.telegram_username,
            first_name: t.first_name,
            last_name: t.last_name,
            version: t.version,
        }
    }
}

// ============================================================================
// Groups
// ============================================================================

/// Group or admin group response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.group_id.into_uuid(),
            name: group.name,
            description: group.description,
            created_at: group.created_at,
        }
    }
}

impl From<AdminGroup> for GroupResponse {
    fn from(group: AdminGroup) -> Self {
        Self {
            id: group.admin_group_id.into_uuid(),
            name: group.name,
            description: group.description,
            created_at: group.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_group_tristate() {
        let absent: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(absent.group_id.is_none());

        let cleared: UpdateUserRequest = serde_json::from_str(r#"{"groupId": null}"#).unwrap();
        assert_eq!(cleared.group_id, Some(None));

        let id = GroupId::new();
        let set: UpdateUserRequest =
            serde_json::from_str(&format!(r#"{{"groupId": "{id}"}}"#)).unwrap();
        assert_eq!(set.group_id, Some(Some(id)));
    }

    #[test]
    fn test_token_response_shape() {
        let json = serde_json::to_value(TokenResponse::bearer("abc".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"token": "abc", "type": "bearer"}));
    }
}
