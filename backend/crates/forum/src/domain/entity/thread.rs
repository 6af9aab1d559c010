//! Thread Entity

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppResult;
use kernel::id::{ThreadId, TopicId};

use crate::domain::value_object::text::{THREAD_TITLE_MAX_LENGTH, title};

#[derive(Debug, Clone)]
pub struct Thread {
    pub thread_id: ThreadId,
    pub topic_id: TopicId,
    pub title: String,
    pub description: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    pub fn new(
        topic_id: TopicId,
        title_raw: impl AsRef<str>,
        description: Option<String>,
    ) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            thread_id: ThreadId::new(),
            topic_id,
            title: title("Thread title", title_raw, THREAD_TITLE_MAX_LENGTH)?,
            description,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }
}
