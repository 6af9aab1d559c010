//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{PostId, TagId, ThreadId, TopicId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{tag::Tag, topic::Topic};
use crate::domain::view::{PostDetails, ThreadDetails};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    pub symbol: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    pub title: String,
    pub description: Option<String>,
}

/// Create post request; an author id in the body is ignored
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub thread_id: ThreadId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Update post request; omitted fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub thread_id: Option<ThreadId>,
    pub tags: Option<Vec<String>>,
    pub expected_version: Option<i32>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicResponse {
    pub id: TopicId,
    pub symbol: String,
    pub title: String,
    pub description: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Topic> for TopicResponse {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.topic_id,
            symbol: topic.symbol.as_str().to_string(),
            title: topic.title,
            description: topic.description,
            version: topic.version,
            created_at: topic.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadResponse {
    pub id: ThreadId,
    pub title: String,
    pub description: Option<String>,
    pub topic: TopicResponse,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ThreadDetails> for ThreadResponse {
    fn from(details: ThreadDetails) -> Self {
        Self {
            id: details.thread.thread_id,
            title: details.thread.title,
            description: details.thread.description,
            topic: details.topic.into(),
            version: details.thread.version,
            created_at: details.thread.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub thread: ThreadResponse,
    pub author: AuthorResponse,
    pub tags: Vec<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostDetails> for PostResponse {
    fn from(details: PostDetails) -> Self {
        Self {
            id: details.post.post_id,
            title: details.post.title,
            content: details.post.content,
            thread: details.thread.into(),
            author: AuthorResponse {
                id: details.author.user_id,
                username: details.author.username,
            },
            tags: details.tags,
            version: details.post.version,
            created_at: details.post.created_at,
            updated_at: details.post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TagResponse {
    pub id: TagId,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.tag_id,
            name: tag.name.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post_ignores_author_fields() {
        let thread_id = ThreadId::new();
        let json = format!(
            r#"{{"threadId": "{thread_id}", "title": "t", "content": "c", "userId": "{}"}}"#,
            UserId::new()
        );
        let req: CreatePostRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.thread_id, thread_id);
        assert!(req.tags.is_empty());
    }
}
