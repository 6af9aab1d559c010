//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer and report constraint violations by name.

use kernel::error::store::StoreResult;
use kernel::id::{PostId, TagId, ThreadId, TopicId, UserId};
use kernel::page::Page;

use crate::domain::entity::{
    post::Post,
    tag::{PostTag, Tag},
    thread::Thread,
    topic::Topic,
};
use crate::domain::value_object::{tag_name::TagName, topic_symbol::TopicSymbol};
use crate::domain::view::{PostDetails, ThreadDetails};

/// Unique constraint names shared by the schema and the services
pub mod constraint {
    pub const TOPICS_SYMBOL_KEY: &str = "topics_symbol_key";
    pub const TAGS_NAME_KEY: &str = "tags_name_key";
    pub const POST_TAGS_POST_ID_TAG_ID_KEY: &str = "post_tags_post_id_tag_id_key";
}

/// Topic repository trait
#[trait_variant::make(TopicRepository: Send)]
pub trait LocalTopicRepository {
    async fn add(&self, topic: &Topic) -> StoreResult<()>;

    async fn update(&self, topic: &mut Topic) -> StoreResult<()>;

    async fn get(&self, topic_id: &TopicId) -> StoreResult<Option<Topic>>;

    async fn get_by_symbol(&self, symbol: &TopicSymbol) -> StoreResult<Option<Topic>>;

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Topic>>;

    async fn delete(&self, topic_id: &TopicId) -> StoreResult<bool>;
}

/// Thread repository trait
#[trait_variant::make(ThreadRepository: Send)]
pub trait LocalThreadRepository {
    async fn add(&self, thread: &Thread) -> StoreResult<()>;

    async fn update(&self, thread: &mut Thread) -> StoreResult<()>;

    async fn get(&self, thread_id: &ThreadId) -> StoreResult<Option<Thread>>;

    async fn get_by_topic(&self, topic_id: &TopicId, page: Page) -> StoreResult<Vec<Thread>>;

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Thread>>;

    async fn delete(&self, thread_id: &ThreadId) -> StoreResult<bool>;
}

/// Post repository trait
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn add(&self, post: &Post) -> StoreResult<()>;

    /// Write back mutated fields; bumps `post.version` on success
    async fn update(&self, post: &mut Post) -> StoreResult<()>;

    async fn get(&self, post_id: &PostId) -> StoreResult<Option<Post>>;

    async fn get_by_thread(&self, thread_id: &ThreadId, page: Page) -> StoreResult<Vec<Post>>;

    /// Posts authored by a user
    async fn get_by_user(&self, user_id: &UserId, page: Page) -> StoreResult<Vec<Post>>;

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Post>>;

    async fn delete(&self, post_id: &PostId) -> StoreResult<bool>;
}

/// Tag repository trait
#[trait_variant::make(TagRepository: Send)]
pub trait LocalTagRepository {
    async fn add(&self, tag: &Tag) -> StoreResult<()>;

    async fn get(&self, tag_id: &TagId) -> StoreResult<Option<Tag>>;

    async fn get_by_name(&self, name: &TagName) -> StoreResult<Option<Tag>>;

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Tag>>;

    async fn delete(&self, tag_id: &TagId) -> StoreResult<bool>;
}

/// Post-tag link repository trait
#[trait_variant::make(PostTagRepository: Send)]
pub trait LocalPostTagRepository {
    async fn add(&self, link: &PostTag) -> StoreResult<()>;

    /// All links of a post, unpaged
    async fn get_by_post(&self, post_id: &PostId) -> StoreResult<Vec<PostTag>>;

    /// Returns how many links were removed
    async fn delete_by_post(&self, post_id: &PostId) -> StoreResult<u64>;
}

/// Joined reads for the HTTP layer
#[trait_variant::make(ForumQueries: Send)]
pub trait LocalForumQueries {
    async fn thread_details(&self, thread_id: &ThreadId) -> StoreResult<Option<ThreadDetails>>;

    async fn threads_by_topic(
        &self,
        topic_id: &TopicId,
        page: Page,
    ) -> StoreResult<Vec<ThreadDetails>>;

    async fn all_threads(&self, page: Page) -> StoreResult<Vec<ThreadDetails>>;

    async fn post_details(&self, post_id: &PostId) -> StoreResult<Option<PostDetails>>;

    async fn posts_by_thread(
        &self,
        thread_id: &ThreadId,
        page: Page,
    ) -> StoreResult<Vec<PostDetails>>;

    async fn posts_by_user(&self, user_id: &UserId, page: Page) -> StoreResult<Vec<PostDetails>>;

    async fn all_posts(&self, page: Page) -> StoreResult<Vec<PostDetails>>;
}
