//! Domain Layer
//!
//! Contains entities, value objects, read models and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;
pub mod view;

// Re-exports
pub use entity::{
    post::Post,
    tag::{PostTag, Tag},
    thread::Thread,
    topic::Topic,
};
pub use repository::{
    ForumQueries, PostRepository, PostTagRepository, TagRepository, ThreadRepository,
    TopicRepository,
};
pub use view::{PostAuthor, PostDetails, ThreadDetails};
