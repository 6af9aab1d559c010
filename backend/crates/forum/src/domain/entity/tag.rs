//! Tag and PostTag Entities

use chrono::{DateTime, Utc};
use kernel::id::{PostId, PostTagId, TagId};

use crate::domain::value_object::tag_name::TagName;

#[derive(Debug, Clone)]
pub struct Tag {
    pub tag_id: TagId,
    /// Unique
    pub name: TagName,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: TagName) -> Self {
        let now = Utc::now();
        Self {
            tag_id: TagId::new(),
            name,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Link between a post and a tag; the pair is unique
#[derive(Debug, Clone)]
pub struct PostTag {
    pub post_tag_id: PostTagId,
    pub post_id: PostId,
    pub tag_id: TagId,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostTag {
    pub fn new(post_id: PostId, tag_id: TagId) -> Self {
        let now = Utc::now();
        Self {
            post_tag_id: PostTagId::new(),
            post_id,
            tag_id,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}
