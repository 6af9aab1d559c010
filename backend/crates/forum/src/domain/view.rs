//! Joined read models
//!
//! Threads always come with their topic and posts with their thread,
//! author and tag names.

use kernel::id::UserId;

use crate::domain::entity::{post::Post, thread::Thread, topic::Topic};

#[derive(Debug, Clone)]
pub struct ThreadDetails {
    pub thread: Thread,
    pub topic: Topic,
}

/// The public part of a post's author
#[derive(Debug, Clone)]
pub struct PostAuthor {
    pub user_id: UserId,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct PostDetails {
    pub post: Post,
    pub thread: ThreadDetails,
    pub author: PostAuthor,
    /// Sorted by name
    pub tags: Vec<String>,
}
