//! Telegram Integration Entity
//!
//! Optional record attached to a user; keyed by the user's id.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

#[derive(Debug, Clone)]
pub struct TelegramIntegration {
    pub user_id: UserId,
    /// Unique when present
    pub telegram_username: Option<String>,
    /// Unique
    pub telegram_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TelegramIntegration {
    pub fn new(
        user_id: UserId,
        telegram_id: i64,
        telegram_username: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            telegram_username,
            telegram_id,
            first_name,
            last_name,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the Telegram-side details
    pub fn relink(
        &mut self,
        telegram_id: i64,
        telegram_username: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) {
        self.telegram_id = telegram_id;
        self.telegram_username = telegram_username;
        self.first_name = first_name;
        self.last_name = last_name;
        self.updated_at = Utc::now();
    }
}
