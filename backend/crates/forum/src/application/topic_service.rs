//! Topic Service
//!
//! Only members of an admin group may open a topic.

use std::sync::Arc;

use kernel::id::TopicId;
use users::User;

use crate::domain::entity::topic::Topic;
use crate::domain::repository::{TopicRepository, constraint};
use crate::domain::value_object::topic_symbol::TopicSymbol;
use crate::error::{ForumError, ForumResult};

pub struct CreateTopicInput {
    pub symbol: String,
    pub title: String,
    pub description: Option<String>,
}

pub struct TopicService<T>
where
    T: TopicRepository,
{
    topic_repo: Arc<T>,
}

impl<T> TopicService<T>
where
    T: TopicRepository,
{
    pub fn new(topic_repo: Arc<T>) -> Self {
        Self { topic_repo }
    }

    pub async fn create_topic(&self, actor: &User, input: CreateTopicInput) -> ForumResult<Topic> {
        if !actor.is_admin() {
            return Err(ForumError::Unauthorized);
        }

        let symbol = TopicSymbol::new(&input.symbol)?;
        let topic = Topic::new(symbol, &input.title, input.description)?;

        self.topic_repo.add(&topic).await.map_err(|e| {
            if e.is_unique_violation(constraint::TOPICS_SYMBOL_KEY) {
                ForumError::SymbolTaken
            } else {
                e.into()
            }
        })?;

        tracing::info!(
            topic_id = %topic.topic_id,
            symbol = %topic.symbol,
            created_by = %actor.user_id,
            "Topic created"
        );

        Ok(topic)
    }

    pub async fn get_topic(&self, topic_id: &TopicId) -> ForumResult<Topic> {
        self.topic_repo
            .get(topic_id)
            .await?
            .ok_or(ForumError::TopicNotFound)
    }

    /// Symbols are matched case-insensitively
    pub async fn get_by_symbol(&self, symbol: &str) -> ForumResult<Topic> {
        let Ok(symbol) = TopicSymbol::new(symbol) else {
            return Err(ForumError::TopicNotFound);
        };
        self.topic_repo
            .get_by_symbol(&symbol)
            .await?
            .ok_or(ForumError::TopicNotFound)
    }
}
