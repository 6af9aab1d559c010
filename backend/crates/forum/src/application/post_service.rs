//! Post Service
//!
//! Posts are always written as the acting user, and only their author may
//! change or remove them.

use std::sync::Arc;

use kernel::id::{PostId, ThreadId};
use users::User;

use crate::domain::entity::{
    post::Post,
    tag::{PostTag, Tag},
};
use crate::domain::repository::{
    PostRepository, PostTagRepository, TagRepository, ThreadRepository, constraint,
};
use crate::domain::value_object::tag_name::TagName;
use crate::error::{ForumError, ForumResult};

/// Create post input; the author is always the acting user
pub struct CreatePostInput {
    pub thread_id: ThreadId,
    pub title: String,
    pub content: String,
    /// Created on first use
    pub tags: Vec<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Default)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub thread_id: Option<ThreadId>,
    /// Replaces the whole tag set when present
    pub tags: Option<Vec<String>>,
    /// Reject the update unless the stored version still matches
    pub expected_version: Option<i32>,
}

pub struct PostService<H, P, T, L>
where
    H: ThreadRepository,
    P: PostRepository,
    T: TagRepository,
    L: PostTagRepository,
{
    thread_repo: Arc<H>,
    post_repo: Arc<P>,
    tag_repo: Arc<T>,
    post_tag_repo: Arc<L>,
}

impl<H, P, T, L> PostService<H, P, T, L>
where
    H: ThreadRepository,
    P: PostRepository,
    T: TagRepository,
    L: PostTagRepository,
{
    pub fn new(
        thread_repo: Arc<H>,
        post_repo: Arc<P>,
        tag_repo: Arc<T>,
        post_tag_repo: Arc<L>,
    ) -> Self {
        Self {
            thread_repo,
            post_repo,
            tag_repo,
            post_tag_repo,
        }
    }

    pub async fn create_post(&self, actor: &User, input: CreatePostInput) -> ForumResult<Post> {
        let post = Post::new(input.thread_id, actor.user_id, &input.title, input.content)?;
        let tags = TagName::parse_list(&input.tags)?;

        self.ensure_thread(&input.thread_id).await?;
        self.post_repo.add(&post).await?;
        self.attach_tags(&post.post_id, tags).await?;

        tracing::info!(
            post_id = %post.post_id,
            thread_id = %post.thread_id,
            user_id = %actor.user_id,
            "Post created"
        );

        Ok(post)
    }

    pub async fn get_post(&self, post_id: &PostId) -> ForumResult<Post> {
        self.post_repo
            .get(post_id)
            .await?
            .ok_or(ForumError::PostNotFound)
    }

    pub async fn update_post(
        &self,
        actor: &User,
        post_id: &PostId,
        input: UpdatePostInput,
    ) -> ForumResult<Post> {
        let mut post = self.get_post(post_id).await?;
        if !post.is_authored_by(&actor.user_id) {
            return Err(ForumError::Unauthorized);
        }
        if input.expected_version.is_some_and(|v| v != post.version) {
            return Err(ForumError::Conflict);
        }

        let tags = input.tags.as_deref().map(TagName::parse_list).transpose()?;

        if let Some(title) = &input.title {
            post.set_title(title)?;
        }
        if let Some(content) = input.content {
            post.set_content(content);
        }
        if let Some(thread_id) = input.thread_id {
            self.ensure_thread(&thread_id).await?;
            post.move_to(thread_id);
        }
        if tags.is_some() {
            post.touch();
        }

        self.post_repo.update(&mut post).await?;

        if let Some(tags) = tags {
            self.post_tag_repo.delete_by_post(post_id).await?;
            self.attach_tags(post_id, tags).await?;
        }

        tracing::info!(post_id = %post_id, version = post.version, "Post updated");

        Ok(post)
    }

    /// Remove the post and its tag links
    pub async fn delete_post(&self, actor: &User, post_id: &PostId) -> ForumResult<()> {
        let post = self.get_post(post_id).await?;
        if !post.is_authored_by(&actor.user_id) {
            return Err(ForumError::Unauthorized);
        }

        self.post_tag_repo.delete_by_post(post_id).await?;
        if !self.post_repo.delete(post_id).await? {
            return Err(ForumError::PostNotFound);
        }

        tracing::info!(post_id = %post_id, user_id = %actor.user_id, "Post deleted");

        Ok(())
    }

    async fn ensure_thread(&self, thread_id: &ThreadId) -> ForumResult<()> {
        match self.thread_repo.get(thread_id).await? {
            Some(_) => Ok(()),
            None => Err(ForumError::ThreadNotFound),
        }
    }

    /// Link the post to each tag, creating missing tags
    async fn attach_tags(&self, post_id: &PostId, names: Vec<TagName>) -> ForumResult<()> {
        for name in names {
            let tag = match self.tag_repo.get_by_name(&name).await? {
                Some(tag) => tag,
                None => {
                    let tag = Tag::new(name);
                    self.tag_repo.add(&tag).await.map_err(|e| {
                        if e.is_unique_violation(constraint::TAGS_NAME_KEY) {
                            ForumError::Conflict
                        } else {
                            e.into()
                        }
                    })?;
                    tracing::debug!(tag_id = %tag.tag_id, name = %tag.name, "Tag created");
                    tag
                }
            };

            self.post_tag_repo
                .add(&PostTag::new(*post_id, tag.tag_id))
                .await?;
        }
        Ok(())
    }
}
