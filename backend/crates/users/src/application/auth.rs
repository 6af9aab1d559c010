//! Authentication Service
//!
//! Credential checks and bearer token round trips. Failures to
//! authenticate are `Ok(None)`, never errors; only storage problems
//! surface as `Err`.

use std::sync::Arc;

use chrono::Utc;
use kernel::error::store::StoreError;
use kernel::id::UserId;
use platform::token::Claims;
use serde_json::Value;

use crate::application::config::UsersConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_password::RawPassword, username::Username};
use crate::error::{UserError, UserResult};

/// Authentication service
pub struct AuthService<U>
where
    U: UserRepository,
{
    users: Arc<U>,
    config: Arc<UsersConfig>,
}

impl<U> AuthService<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, config: Arc<UsersConfig>) -> Self {
        Self { users, config }
    }

    /// Look up by username and verify the password
    pub async fn authenticate(&self, username: &str, password: &str) -> UserResult<Option<User>> {
        let (Ok(username), Ok(raw)) = (
            Username::new(username),
            RawPassword::new(password.to_string()),
        ) else {
            return Ok(None);
        };

        let Some(user) = self.users.get_by_username(&username).await? else {
            tracing::debug!(username = %username, "Login for unknown user");
            return Ok(None);
        };

        if !user.verify_password(&raw, &self.config.hashing) {
            tracing::warn!(user_id = %user.user_id, "Wrong password");
            return Ok(None);
        }

        tracing::info!(user_id = %user.user_id, "User authenticated");

        if user.password_needs_rehash(&self.config.hashing) {
            return Ok(Some(self.upgrade_password(user, &raw).await?));
        }
        Ok(Some(user))
    }

    /// Re-hash under the current policy; a concurrent edit keeps the old hash
    async fn upgrade_password(&self, user: User, raw: &RawPassword) -> UserResult<User> {
        let mut upgraded = user.clone();
        if let Err(e) = upgraded.set_password(raw, &self.config.hashing) {
            tracing::warn!(user_id = %user.user_id, error = %e, "Password rehash failed");
            return Ok(user);
        }

        match self.users.update(&mut upgraded).await {
            Ok(()) => {
                tracing::info!(user_id = %upgraded.user_id, "Password hash upgraded");
                Ok(upgraded)
            }
            Err(StoreError::StaleWrite) => {
                tracing::debug!(user_id = %user.user_id, "User changed during rehash");
                Ok(user)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Token whose `sub` is the user's id, valid for the configured TTL
    pub fn issue_session_token(&self, user: &User) -> UserResult<String> {
        let now = Utc::now().timestamp();

        let mut claims = Claims::new();
        claims.insert("sub".to_string(), Value::String(user.user_id.to_string()));
        claims.insert("iat".to_string(), Value::from(now));
        claims.insert(
            "exp".to_string(),
            Value::from(now.saturating_add(self.config.token_ttl_secs())),
        );

        self.config
            .tokens
            .issue(&claims, None)
            .map_err(|e| UserError::Internal(e.to_string()))
    }

    /// Decode the token and re-fetch its subject
    pub async fn resolve_user_from_token(&self, token: &str) -> UserResult<Option<User>> {
        let Some(claims) = self.config.tokens.verify(token, None) else {
            return Ok(None);
        };

        let Some(user_id) = claims
            .get("sub")
            .and_then(Value::as_str)
            .and_then(|sub| sub.parse::<UserId>().ok())
        else {
            tracing::debug!("Token without a usable subject");
            return Ok(None);
        };

        Ok(self.users.get(&user_id).await?)
    }
}
