//! In-memory repository used by the service tests

use kernel::error::store::StoreResult;
use kernel::id::{PostId, TagId, ThreadId, TopicId, UserId};
use kernel::memory::{MemoryTable, Record, UniqueIndex};
use kernel::page::Page;
use uuid::Uuid;

use crate::domain::entity::{
    post::Post,
    tag::{PostTag, Tag},
    thread::Thread,
    topic::Topic,
};
use crate::domain::repository::{
    PostRepository, PostTagRepository, TagRepository, ThreadRepository, TopicRepository,
    constraint,
};
use crate::domain::value_object::{tag_name::TagName, topic_symbol::TopicSymbol};

macro_rules! record {
    ($ty:ty, $key:ident) => {
        impl Record for $ty {
            fn key(&self) -> Uuid {
                self.$key.into_uuid()
            }

            fn version(&self) -> i32 {
                self.version
            }

            fn version_mut(&mut self) -> &mut i32 {
                &mut self.version
            }
        }
    };
}

record!(Topic, topic_id);
record!(Thread, thread_id);
record!(Post, post_id);
record!(Tag, tag_id);
record!(PostTag, post_tag_id);

/// Tables mirroring the forum schema, including its unique constraints
#[derive(Clone)]
pub struct MemoryForumRepository {
    topics: MemoryTable<Topic>,
    threads: MemoryTable<Thread>,
    posts: MemoryTable<Post>,
    tags: MemoryTable<Tag>,
    post_tags: MemoryTable<PostTag>,
}

impl Default for MemoryForumRepository {
    fn default() -> Self {
        Self {
            topics: MemoryTable::new(vec![UniqueIndex::new(
                constraint::TOPICS_SYMBOL_KEY,
                |t: &Topic| Some(t.symbol.as_str().to_string()),
            )]),
            threads: MemoryTable::default(),
            posts: MemoryTable::default(),
            tags: MemoryTable::new(vec![UniqueIndex::new(
                constraint::TAGS_NAME_KEY,
                |t: &Tag| Some(t.name.as_str().to_string()),
            )]),
            post_tags: MemoryTable::new(vec![UniqueIndex::new(
                constraint::POST_TAGS_POST_ID_TAG_ID_KEY,
                |l: &PostTag| Some(format!("{}:{}", l.post_id, l.tag_id)),
            )]),
        }
    }
}

impl TopicRepository for MemoryForumRepository {
    async fn add(&self, topic: &Topic) -> StoreResult<()> {
        self.topics.insert(topic.clone()).await
    }

    async fn update(&self, topic: &mut Topic) -> StoreResult<()> {
        self.topics.update(topic).await
    }

    async fn get(&self, topic_id: &TopicId) -> StoreResult<Option<Topic>> {
        Ok(self.topics.get(topic_id.into_uuid()).await)
    }

    async fn get_by_symbol(&self, symbol: &TopicSymbol) -> StoreResult<Option<Topic>> {
        Ok(self.topics.find(|t| t.symbol == *symbol).await)
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Topic>> {
        Ok(self.topics.filter(|_| true, page).await)
    }

    async fn delete(&self, topic_id: &TopicId) -> StoreResult<bool> {
        Ok(self.topics.remove(topic_id.into_uuid()).await)
    }
}

impl ThreadRepository for MemoryForumRepository {
    async fn add(&self, thread: &Thread) -> StoreResult<()> {
        self.threads.insert(thread.clone()).await
    }

    async fn update(&self, thread: &mut Thread) -> StoreResult<()> {
        self.threads.update(thread).await
    }

    async fn get(&self, thread_id: &ThreadId) -> StoreResult<Option<Thread>> {
        Ok(self.threads.get(thread_id.into_uuid()).await)
    }

    async fn get_by_topic(&self, topic_id: &TopicId, page: Page) -> StoreResult<Vec<Thread>> {
        Ok(self.threads.filter(|t| t.topic_id == *topic_id, page).await)
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Thread>> {
        Ok(self.threads.filter(|_| true, page).await)
    }

    async fn delete(&self, thread_id: &ThreadId) -> StoreResult<bool> {
        Ok(self.threads.remove(thread_id.into_uuid()).await)
    }
}

impl PostRepository for MemoryForumRepository {
    async fn add(&self, post: &Post) -> StoreResult<()> {
        self.posts.insert(post.clone()).await
    }

    async fn update(&self, post: &mut Post) -> StoreResult<()> {
        self.posts.update(post).await
    }

    async fn get(&self, post_id: &PostId) -> StoreResult<Option<Post>> {
        Ok(self.posts.get(post_id.into_uuid()).await)
    }

    async fn get_by_thread(&self, thread_id: &ThreadId, page: Page) -> StoreResult<Vec<Post>> {
        Ok(self.posts.filter(|p| p.thread_id == *thread_id, page).await)
    }

    async fn get_by_user(&self, user_id: &UserId, page: Page) -> StoreResult<Vec<Post>> {
        Ok(self.posts.filter(|p| p.user_id == *user_id, page).await)
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Post>> {
        Ok(self.posts.filter(|_| true, page).await)
    }

    async fn delete(&self, post_id: &PostId) -> StoreResult<bool> {
        Ok(self.posts.remove(post_id.into_uuid()).await)
    }
}

impl TagRepository for MemoryForumRepository {
    async fn add(&self, tag: &Tag) -> StoreResult<()> {
        self.tags.insert(tag.clone()).await
    }

    async fn get(&self, tag_id: &TagId) -> StoreResult<Option<Tag>> {
        Ok(self.tags.get(tag_id.into_uuid()).await)
    }

    async fn get_by_name(&self, name: &TagName) -> StoreResult<Option<Tag>> {
        Ok(self.tags.find(|t| t.name == *name).await)
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Tag>> {
        Ok(self.tags.filter(|_| true, page).await)
    }

    async fn delete(&self, tag_id: &TagId) -> StoreResult<bool> {
        Ok(self.tags.remove(tag_id.into_uuid()).await)
    }
}

impl PostTagRepository for MemoryForumRepository {
    async fn add(&self, link: &PostTag) -> StoreResult<()> {
        self.post_tags.insert(link.clone()).await
    }

    async fn get_by_post(&self, post_id: &PostId) -> StoreResult<Vec<PostTag>> {
        Ok(self.post_tags.filter_all(|l| l.post_id == *post_id).await)
    }

    async fn delete_by_post(&self, post_id: &PostId) -> StoreResult<u64> {
        let removed = self.post_tags.remove_where(|l| l.post_id == *post_id).await;
        Ok(removed as u64)
    }
}
