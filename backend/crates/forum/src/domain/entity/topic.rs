//! Topic Entity
//!
//! Top-level board, addressed by a short unique symbol.

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppResult;
use kernel::id::TopicId;

use crate::domain::value_object::{
    text::{TOPIC_TITLE_MAX_LENGTH, title},
    topic_symbol::TopicSymbol,
};

#[derive(Debug, Clone)]
pub struct Topic {
    pub topic_id: TopicId,
    /// Unique
    pub symbol: TopicSymbol,
    pub title: String,
    pub description: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Topic {
    pub fn new(
        symbol: TopicSymbol,
        title_raw: impl AsRef<str>,
        description: Option<String>,
    ) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            topic_id: TopicId::new(),
            symbol,
            title: title("Topic title", title_raw, TOPIC_TITLE_MAX_LENGTH)?,
            description,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }
}
