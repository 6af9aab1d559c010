//! PostgreSQL Repository Implementations
//!
//! Every statement runs on the request's [`PgSession`]. Joined reads go
//! through [`ForumQueries`]; tag names are fetched in one extra query per
//! page of posts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::error::store::{StoreError, StoreResult};
use kernel::id::{PostId, PostTagId, TagId, ThreadId, TopicId, UserId};
use kernel::page::Page;
use kernel::session::PgSession;
use uuid::Uuid;

use crate::domain::entity::{
    post::Post,
    tag::{PostTag, Tag},
    thread::Thread,
    topic::Topic,
};
use crate::domain::repository::{
    ForumQueries, PostRepository, PostTagRepository, TagRepository, ThreadRepository,
    TopicRepository,
};
use crate::domain::value_object::{tag_name::TagName, topic_symbol::TopicSymbol};
use crate::domain::view::{PostAuthor, PostDetails, ThreadDetails};

macro_rules! select_topics {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT
                topic_id,
                symbol,
                title,
                description,
                version,
                created_at,
                updated_at
            FROM topics
            "#,
            $tail
        )
    };
}

macro_rules! select_threads {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT
                thread_id,
                topic_id,
                title,
                description,
                version,
                created_at,
                updated_at
            FROM threads
            "#,
            $tail
        )
    };
}

macro_rules! select_posts {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT
                post_id,
                thread_id,
                user_id,
                title,
                content,
                version,
                created_at,
                updated_at
            FROM posts
            "#,
            $tail
        )
    };
}

macro_rules! select_tags {
    ($tail:literal) => {
        concat!(
            "SELECT tag_id, name, version, created_at, updated_at FROM tags ",
            $tail
        )
    };
}

/// Thread joined with its topic; columns prefixed `th_` and `tp_`
macro_rules! select_thread_details {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT
                th.thread_id AS th_thread_id,
                th.title AS th_title,
                th.description AS th_description,
                th.version AS th_version,
                th.created_at AS th_created_at,
                th.updated_at AS th_updated_at,
                tp.topic_id AS tp_topic_id,
                tp.symbol AS tp_symbol,
                tp.title AS tp_title,
                tp.description AS tp_description,
                tp.version AS tp_version,
                tp.created_at AS tp_created_at,
                tp.updated_at AS tp_updated_at
            FROM threads th
            JOIN topics tp ON tp.topic_id = th.topic_id
            "#,
            $tail
        )
    };
}

/// Post joined with thread, topic and author; thread columns as above
macro_rules! select_post_details {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT
                p.post_id,
                p.user_id,
                p.title,
                p.content,
                p.version,
                p.created_at,
                p.updated_at,
                u.username,
                th.thread_id AS th_thread_id,
                th.title AS th_title,
                th.description AS th_description,
                th.version AS th_version,
                th.created_at AS th_created_at,
                th.updated_at AS th_updated_at,
                tp.topic_id AS tp_topic_id,
                tp.symbol AS tp_symbol,
                tp.title AS tp_title,
                tp.description AS tp_description,
                tp.version AS tp_version,
                tp.created_at AS tp_created_at,
                tp.updated_at AS tp_updated_at
            FROM posts p
            JOIN threads th ON th.thread_id = p.thread_id
            JOIN topics tp ON tp.topic_id = th.topic_id
            JOIN users u ON u.user_id = p.user_id
            "#,
            $tail
        )
    };
}

/// Zero affected rows on a version-guarded write means the row moved on
fn ensure_written(rows_affected: u64) -> StoreResult<()> {
    if rows_affected == 0 {
        Err(StoreError::StaleWrite)
    } else {
        Ok(())
    }
}

/// PostgreSQL-backed forum repository
#[derive(Clone)]
pub struct PgForumRepository {
    session: PgSession,
}

impl PgForumRepository {
    pub fn new(session: PgSession) -> Self {
        Self { session }
    }

    /// Attach tag names to a page of joined posts
    async fn with_tags(&self, rows: Vec<PostDetailsRow>) -> StoreResult<Vec<PostDetails>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.post_id).collect();
        let mut tags = if ids.is_empty() {
            HashMap::new()
        } else {
            let mut session = self.session.lock().await;
            let pairs = sqlx::query_as::<_, (Uuid, String)>(
                r#"
                SELECT pt.post_id, t.name
                FROM post_tags pt
                JOIN tags t ON t.tag_id = pt.tag_id
                WHERE pt.post_id = ANY($1)
                ORDER BY t.name
                "#,
            )
            .bind(&ids)
            .fetch_all(session.conn()?)
            .await?;

            let mut tags: HashMap<Uuid, Vec<String>> = HashMap::new();
            for (post_id, name) in pairs {
                tags.entry(post_id).or_default().push(name);
            }
            tags
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                let names = tags.remove(&row.post_id).unwrap_or_default();
                row.into_details(names)
            })
            .collect())
    }
}

// ============================================================================
// Topic Repository Implementation
// ============================================================================

impl TopicRepository for PgForumRepository {
    async fn add(&self, topic: &Topic) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO topics (topic_id, symbol, title, description, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(topic.topic_id.as_uuid())
        .bind(topic.symbol.as_str())
        .bind(&topic.title)
        .bind(&topic.description)
        .bind(topic.version)
        .bind(topic.created_at)
        .bind(topic.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn update(&self, topic: &mut Topic) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE topics SET
                symbol = $3,
                title = $4,
                description = $5,
                updated_at = $6,
                version = version + 1
            WHERE topic_id = $1 AND version = $2
            "#,
        )
        .bind(topic.topic_id.as_uuid())
        .bind(topic.version)
        .bind(topic.symbol.as_str())
        .bind(&topic.title)
        .bind(&topic.description)
        .bind(topic.updated_at)
        .execute(session.conn()?)
        .await?;

        ensure_written(result.rows_affected())?;
        topic.version += 1;
        Ok(())
    }

    async fn get(&self, topic_id: &TopicId) -> StoreResult<Option<Topic>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, TopicRow>(select_topics!("WHERE topic_id = $1"))
            .bind(topic_id.as_uuid())
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(TopicRow::into_topic))
    }

    async fn get_by_symbol(&self, symbol: &TopicSymbol) -> StoreResult<Option<Topic>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, TopicRow>(select_topics!("WHERE symbol = $1"))
            .bind(symbol.as_str())
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(TopicRow::into_topic))
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Topic>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, TopicRow>(select_topics!(
            "ORDER BY created_at, topic_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(TopicRow::into_topic).collect())
    }

    async fn delete(&self, topic_id: &TopicId) -> StoreResult<bool> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM topics WHERE topic_id = $1")
            .bind(topic_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Thread Repository Implementation
// ============================================================================

impl ThreadRepository for PgForumRepository {
    async fn add(&self, thread: &Thread) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO threads (thread_id, topic_id, title, description, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(thread.thread_id.as_uuid())
        .bind(thread.topic_id.as_uuid())
        .bind(&thread.title)
        .bind(&thread.description)
        .bind(thread.version)
        .bind(thread.created_at)
        .bind(thread.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn update(&self, thread: &mut Thread) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE threads SET
                topic_id = $3,
                title = $4,
                description = $5,
                updated_at = $6,
                version = version + 1
            WHERE thread_id = $1 AND version = $2
            "#,
        )
        .bind(thread.thread_id.as_uuid())
        .bind(thread.version)
        .bind(thread.topic_id.as_uuid())
        .bind(&thread.title)
        .bind(&thread.description)
        .bind(thread.updated_at)
        .execute(session.conn()?)
        .await?;

        ensure_written(result.rows_affected())?;
        thread.version += 1;
        Ok(())
    }

    async fn get(&self, thread_id: &ThreadId) -> StoreResult<Option<Thread>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, ThreadRow>(select_threads!("WHERE thread_id = $1"))
            .bind(thread_id.as_uuid())
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(ThreadRow::into_thread))
    }

    async fn get_by_topic(&self, topic_id: &TopicId, page: Page) -> StoreResult<Vec<Thread>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, ThreadRow>(select_threads!(
            "WHERE topic_id = $1 ORDER BY created_at, thread_id LIMIT $2 OFFSET $3"
        ))
        .bind(topic_id.as_uuid())
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(ThreadRow::into_thread).collect())
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Thread>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, ThreadRow>(select_threads!(
            "ORDER BY created_at, thread_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(ThreadRow::into_thread).collect())
    }

    async fn delete(&self, thread_id: &ThreadId) -> StoreResult<bool> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM threads WHERE thread_id = $1")
            .bind(thread_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for PgForumRepository {
    async fn add(&self, post: &Post) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO posts (
                post_id,
                thread_id,
                user_id,
                title,
                content,
                version,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.thread_id.as_uuid())
        .bind(post.user_id.as_uuid())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.version)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn update(&self, post: &mut Post) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE posts SET
                thread_id = $3,
                title = $4,
                content = $5,
                updated_at = $6,
                version = version + 1
            WHERE post_id = $1 AND version = $2
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.version)
        .bind(post.thread_id.as_uuid())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.updated_at)
        .execute(session.conn()?)
        .await?;

        ensure_written(result.rows_affected())?;
        post.version += 1;
        Ok(())
    }

    async fn get(&self, post_id: &PostId) -> StoreResult<Option<Post>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, PostRow>(select_posts!("WHERE post_id = $1"))
            .bind(post_id.as_uuid())
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(PostRow::into_post))
    }

    async fn get_by_thread(&self, thread_id: &ThreadId, page: Page) -> StoreResult<Vec<Post>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, PostRow>(select_posts!(
            "WHERE thread_id = $1 ORDER BY created_at, post_id LIMIT $2 OFFSET $3"
        ))
        .bind(thread_id.as_uuid())
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn get_by_user(&self, user_id: &UserId, page: Page) -> StoreResult<Vec<Post>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, PostRow>(select_posts!(
            "WHERE user_id = $1 ORDER BY created_at, post_id LIMIT $2 OFFSET $3"
        ))
        .bind(user_id.as_uuid())
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Post>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, PostRow>(select_posts!(
            "ORDER BY created_at, post_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn delete(&self, post_id: &PostId) -> StoreResult<bool> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM posts WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Tag Repository Implementations
// ============================================================================

impl TagRepository for PgForumRepository {
    async fn add(&self, tag: &Tag) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO tags (tag_id, name, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(tag.tag_id.as_uuid())
        .bind(tag.name.as_str())
        .bind(tag.version)
        .bind(tag.created_at)
        .bind(tag.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn get(&self, tag_id: &TagId) -> StoreResult<Option<Tag>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, TagRow>(select_tags!("WHERE tag_id = $1"))
            .bind(tag_id.as_uuid())
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(TagRow::into_tag))
    }

    async fn get_by_name(&self, name: &TagName) -> StoreResult<Option<Tag>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, TagRow>(select_tags!("WHERE name = $1"))
            .bind(name.as_str())
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(TagRow::into_tag))
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Tag>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, TagRow>(select_tags!(
            "ORDER BY created_at, tag_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(TagRow::into_tag).collect())
    }

    async fn delete(&self, tag_id: &TagId) -> StoreResult<bool> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM tags WHERE tag_id = $1")
            .bind(tag_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl PostTagRepository for PgForumRepository {
    async fn add(&self, link: &PostTag) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO post_tags (post_tag_id, post_id, tag_id, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(link.post_tag_id.as_uuid())
        .bind(link.post_id.as_uuid())
        .bind(link.tag_id.as_uuid())
        .bind(link.version)
        .bind(link.created_at)
        .bind(link.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn get_by_post(&self, post_id: &PostId) -> StoreResult<Vec<PostTag>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, PostTagRow>(
            r#"
            SELECT post_tag_id, post_id, tag_id, version, created_at, updated_at
            FROM post_tags
            WHERE post_id = $1
            ORDER BY created_at, post_tag_id
            "#,
        )
        .bind(post_id.as_uuid())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(PostTagRow::into_post_tag).collect())
    }

    async fn delete_by_post(&self, post_id: &PostId) -> StoreResult<u64> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// Joined reads
// ============================================================================

impl ForumQueries for PgForumRepository {
    async fn thread_details(&self, thread_id: &ThreadId) -> StoreResult<Option<ThreadDetails>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, ThreadDetailsRow>(select_thread_details!(
            "WHERE th.thread_id = $1"
        ))
        .bind(thread_id.as_uuid())
        .fetch_optional(session.conn()?)
        .await?;

        Ok(row.map(ThreadDetailsRow::into_details))
    }

    async fn threads_by_topic(
        &self,
        topic_id: &TopicId,
        page: Page,
    ) -> StoreResult<Vec<ThreadDetails>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, ThreadDetailsRow>(select_thread_details!(
            "WHERE th.topic_id = $1 ORDER BY th.created_at, th.thread_id LIMIT $2 OFFSET $3"
        ))
        .bind(topic_id.as_uuid())
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(ThreadDetailsRow::into_details).collect())
    }

    async fn all_threads(&self, page: Page) -> StoreResult<Vec<ThreadDetails>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, ThreadDetailsRow>(select_thread_details!(
            "ORDER BY th.created_at, th.thread_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(ThreadDetailsRow::into_details).collect())
    }

    async fn post_details(&self, post_id: &PostId) -> StoreResult<Option<PostDetails>> {
        let row = {
            let mut session = self.session.lock().await;
            sqlx::query_as::<_, PostDetailsRow>(select_post_details!("WHERE p.post_id = $1"))
                .bind(post_id.as_uuid())
                .fetch_optional(session.conn()?)
                .await?
        };

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.with_tags(vec![row]).await?.pop())
    }

    async fn posts_by_thread(
        &self,
        thread_id: &ThreadId,
        page: Page,
    ) -> StoreResult<Vec<PostDetails>> {
        let rows = {
            let mut session = self.session.lock().await;
            sqlx::query_as::<_, PostDetailsRow>(select_post_details!(
                "WHERE p.thread_id = $1 ORDER BY p.created_at, p.post_id LIMIT $2 OFFSET $3"
            ))
            .bind(thread_id.as_uuid())
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(session.conn()?)
            .await?
        };

        self.with_tags(rows).await
    }

    async fn posts_by_user(&self, user_id: &UserId, page: Page) -> StoreResult<Vec<PostDetails>> {
        let rows = {
            let mut session = self.session.lock().await;
            sqlx::query_as::<_, PostDetailsRow>(select_post_details!(
                "WHERE p.user_id = $1 ORDER BY p.created_at, p.post_id LIMIT $2 OFFSET $3"
            ))
            .bind(user_id.as_uuid())
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(session.conn()?)
            .await?
        };

        self.with_tags(rows).await
    }

    async fn all_posts(&self, page: Page) -> StoreResult<Vec<PostDetails>> {
        let rows = {
            let mut session = self.session.lock().await;
            sqlx::query_as::<_, PostDetailsRow>(select_post_details!(
                "ORDER BY p.created_at, p.post_id LIMIT $1 OFFSET $2"
            ))
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(session.conn()?)
            .await?
        };

        self.with_tags(rows).await
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct TopicRow {
    topic_id: Uuid,
    symbol: String,
    title: String,
    description: Option<String>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TopicRow {
    fn into_topic(self) -> Topic {
        Topic {
            topic_id: TopicId::from_uuid(self.topic_id),
            symbol: TopicSymbol::from_db(self.symbol),
            title: self.title,
            description: self.description,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ThreadRow {
    thread_id: Uuid,
    topic_id: Uuid,
    title: String,
    description: Option<String>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ThreadRow {
    fn into_thread(self) -> Thread {
        Thread {
            thread_id: ThreadId::from_uuid(self.thread_id),
            topic_id: TopicId::from_uuid(self.topic_id),
            title: self.title,
            description: self.description,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: Uuid,
    thread_id: Uuid,
    user_id: Uuid,
    title: String,
    content: String,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            post_id: PostId::from_uuid(self.post_id),
            thread_id: ThreadId::from_uuid(self.thread_id),
            user_id: UserId::from_uuid(self.user_id),
            title: self.title,
            content: self.content,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TagRow {
    tag_id: Uuid,
    name: String,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TagRow {
    fn into_tag(self) -> Tag {
        Tag {
            tag_id: TagId::from_uuid(self.tag_id),
            name: TagName::from_db(self.name),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostTagRow {
    post_tag_id: Uuid,
    post_id: Uuid,
    tag_id: Uuid,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostTagRow {
    fn into_post_tag(self) -> PostTag {
        PostTag {
            post_tag_id: PostTagId::from_uuid(self.post_tag_id),
            post_id: PostId::from_uuid(self.post_id),
            tag_id: TagId::from_uuid(self.tag_id),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ThreadDetailsRow {
    th_thread_id: Uuid,
    th_title: String,
    th_description: Option<String>,
    th_version: i32,
    th_created_at: DateTime<Utc>,
    th_updated_at: DateTime<Utc>,
    tp_topic_id: Uuid,
    tp_symbol: String,
    tp_title: String,
    tp_description: Option<String>,
    tp_version: i32,
    tp_created_at: DateTime<Utc>,
    tp_updated_at: DateTime<Utc>,
}

impl ThreadDetailsRow {
    fn into_details(self) -> ThreadDetails {
        let topic_id = TopicId::from_uuid(self.tp_topic_id);
        ThreadDetails {
            thread: Thread {
                thread_id: ThreadId::from_uuid(self.th_thread_id),
                topic_id,
                title: self.th_title,
                description: self.th_description,
                version: self.th_version,
                created_at: self.th_created_at,
                updated_at: self.th_updated_at,
            },
            topic: Topic {
                topic_id,
                symbol: TopicSymbol::from_db(self.tp_symbol),
                title: self.tp_title,
                description: self.tp_description,
                version: self.tp_version,
                created_at: self.tp_created_at,
                updated_at: self.tp_updated_at,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostDetailsRow {
    post_id: Uuid,
    user_id: Uuid,
    title: String,
    content: String,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    username: String,
    #[sqlx(flatten)]
    thread: ThreadDetailsRow,
}

impl PostDetailsRow {
    fn into_details(self, tags: Vec<String>) -> PostDetails {
        let thread = self.thread.into_details();
        PostDetails {
            post: Post {
                post_id: PostId::from_uuid(self.post_id),
                thread_id: thread.thread.thread_id,
                user_id: UserId::from_uuid(self.user_id),
                title: self.title,
                content: self.content,
                version: self.version,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            thread,
            author: PostAuthor {
                user_id: UserId::from_uuid(self.user_id),
                username: self.username,
            },
            tags,
        }
    }
}
