//! Telegram Link Service
//!
//! Attaches or removes the optional Telegram record of the acting user.

use std::sync::Arc;

use kernel::error::store::StoreError;
use kernel::id::UserId;

use crate::domain::entity::{telegram::TelegramIntegration, user::User};
use crate::domain::repository::{TelegramIntegrationRepository, constraint};
use crate::error::{UserError, UserResult};

/// Telegram account details
pub struct LinkTelegramInput {
    pub telegram_id: i64,
    pub telegram_username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

fn telegram_conflict(err: StoreError) -> UserError {
    if err.is_unique_violation(constraint::TELEGRAM_ID_KEY)
        || err.is_unique_violation(constraint::TELEGRAM_USERNAME_KEY)
    {
        UserError::TelegramAlreadyLinked
    } else {
        err.into()
    }
}

/// Telegram link service
pub struct TelegramLinkService<T>
where
    T: TelegramIntegrationRepository,
{
    integrations: Arc<T>,
}

impl<T> TelegramLinkService<T>
where
    T: TelegramIntegrationRepository,
{
    pub fn new(integrations: Arc<T>) -> Self {
        Self { integrations }
    }

    /// Link a Telegram account, replacing the details of an existing link
    pub async fn link(
        &self,
        actor: &User,
        target: &UserId,
        input: LinkTelegramInput,
    ) -> UserResult<TelegramIntegration> {
        if actor.user_id != *target {
            return Err(UserError::Forbidden);
        }

        let telegram_username = input
            .telegram_username
            .map(|name| name.trim().trim_start_matches('@').to_string())
            .filter(|name| !name.is_empty());

        let integration = match self.integrations.get(target).await? {
            Some(mut existing) => {
                existing.relink(
                    input.telegram_id,
                    telegram_username,
                    input.first_name,
                    input.last_name,
                );
                self.integrations
                    .update(&mut existing)
                    .await
                    .map_err(telegram_conflict)?;
                existing
            }
            None => {
                let integration = TelegramIntegration::new(
                    *target,
                    input.telegram_id,
                    telegram_username,
                    input.first_name,
                    input.last_name,
                );
                self.integrations
                    .add(&integration)
                    .await
                    .map_err(telegram_conflict)?;
                integration
            }
        };

        tracing::info!(
            user_id = %target,
            telegram_id = integration.telegram_id,
            "Telegram account linked"
        );

        Ok(integration)
    }

    pub async fn unlink(&self, actor: &User, target: &UserId) -> UserResult<()> {
        if actor.user_id != *target {
            return Err(UserError::Forbidden);
        }

        if !self.integrations.delete(target).await? {
            return Err(UserError::NotFound);
        }

        tracing::info!(user_id = %target, "Telegram account unlinked");

        Ok(())
    }
}
