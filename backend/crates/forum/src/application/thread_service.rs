//! Thread Service

use std::sync::Arc;

use kernel::id::TopicId;
use users::User;

use crate::domain::entity::thread::Thread;
use crate::domain::repository::{ThreadRepository, TopicRepository};
use crate::error::{ForumError, ForumResult};

pub struct CreateThreadInput {
    pub title: String,
    pub description: Option<String>,
}

pub struct ThreadService<T, H>
where
    T: TopicRepository,
    H: ThreadRepository,
{
    topic_repo: Arc<T>,
    thread_repo: Arc<H>,
}

impl<T, H> ThreadService<T, H>
where
    T: TopicRepository,
    H: ThreadRepository,
{
    pub fn new(topic_repo: Arc<T>, thread_repo: Arc<H>) -> Self {
        Self {
            topic_repo,
            thread_repo,
        }
    }

    /// Open a thread under an existing topic
    pub async fn create_thread(
        &self,
        actor: &User,
        topic_id: &TopicId,
        input: CreateThreadInput,
    ) -> ForumResult<Thread> {
        let thread = Thread::new(*topic_id, &input.title, input.description)?;

        if self.topic_repo.get(topic_id).await?.is_none() {
            return Err(ForumError::TopicNotFound);
        }

        self.thread_repo.add(&thread).await?;

        tracing::info!(
            thread_id = %thread.thread_id,
            topic_id = %topic_id,
            created_by = %actor.user_id,
            "Thread created"
        );

        Ok(thread)
    }
}
