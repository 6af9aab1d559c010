//! Application Layer
//!
//! Services orchestrating the forum repositories.

pub mod post_service;
pub mod thread_service;
pub mod topic_service;

// Re-exports
pub use post_service::{CreatePostInput, PostService, UpdatePostInput};
pub use thread_service::{CreateThreadInput, ThreadService};
pub use topic_service::{CreateTopicInput, TopicService};
