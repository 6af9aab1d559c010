use axum::{
    Router,
    routing::{get, put},
};

pub use super::handlers::ForumState;
use super::handlers::{
    create_post, create_thread, create_topic, delete_post, get_post, get_thread, get_topic,
    get_topic_by_symbol, list_posts, list_tags, list_threads, list_topics, thread_posts,
    topic_threads, update_post, user_posts,
};

/// Build the forum router
pub fn forum_router(state: ForumState) -> Router {
    Router::new()
        .route("/topics", get(list_topics).post(create_topic))
        .route("/topics/{topic_id}", get(get_topic))
        .route("/topics/symbol/{symbol}", get(get_topic_by_symbol))
        .route(
            "/topics/{topic_id}/threads",
            get(topic_threads).post(create_thread),
        )
        .route("/threads", get(list_threads))
        .route("/threads/{thread_id}", get(get_thread))
        .route("/topics/threads/{thread_id}/posts", get(thread_posts))
        .route("/topics/threads/posts", get(list_posts).post(create_post))
        .route("/topics/threads/posts/users/{user_id}", get(user_posts))
        .route(
            "/topics/threads/posts/{post_id}",
            put(update_post).get(get_post).delete(delete_post),
        )
        .route("/tags", get(list_tags))
        .with_state(state)
}
