//! Post Entity
//!
//! The author is fixed at creation; only the author may change or remove
//! the post.

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppResult;
use kernel::id::{PostId, ThreadId, UserId};

use crate::domain::value_object::text::{POST_TITLE_MAX_LENGTH, title};

#[derive(Debug, Clone)]
pub struct Post {
    pub post_id: PostId,
    pub thread_id: ThreadId,
    /// Author
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        thread_id: ThreadId,
        author: UserId,
        title_raw: impl AsRef<str>,
        content: String,
    ) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            post_id: PostId::new(),
            thread_id,
            user_id: author,
            title: title("Post title", title_raw, POST_TITLE_MAX_LENGTH)?,
            content,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_authored_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }

    pub fn set_title(&mut self, title_raw: impl AsRef<str>) -> AppResult<()> {
        self.title = title("Post title", title_raw, POST_TITLE_MAX_LENGTH)?;
        self.touch();
        Ok(())
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.touch();
    }

    /// Move the post to another thread
    pub fn move_to(&mut self, thread_id: ThreadId) {
        self.thread_id = thread_id;
        self.touch();
    }

    /// Refresh `updated_at`, e.g. when only the tags changed
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post() {
        let author = UserId::new();
        let post = Post::new(ThreadId::new(), author, " Hello ", "body".to_string()).unwrap();
        assert_eq!(post.title, "Hello");
        assert!(post.is_authored_by(&author));
        assert!(!post.is_authored_by(&UserId::new()));
        assert_eq!(post.version, 1);
    }

    #[test]
    fn test_title_too_long() {
        let long = "x".repeat(POST_TITLE_MAX_LENGTH + 1);
        assert!(Post::new(ThreadId::new(), UserId::new(), long, String::new()).is_err());
    }
}
