//! HTTP Handlers
//!
//! Reads return the joined views from [`ForumQueries`]; writes go through
//! the services and commit the request's session.

use axum::Json;
use axum::extract::{FromRef, Path, Query, State};
use axum::http::StatusCode;
use kernel::id::{PostId, ThreadId, TopicId, UserId};
use kernel::page::Page;
use kernel::session::PgSession;
use platform::bearer::BearerToken;
use sqlx::PgPool;
use std::sync::Arc;
use users::{UsersConfig, authenticate};

use crate::application::{
    CreatePostInput, CreateThreadInput, CreateTopicInput, PostService, ThreadService,
    TopicService, UpdatePostInput,
};
use crate::domain::repository::{ForumQueries, TagRepository, TopicRepository};
use crate::error::{ForumError, ForumResult};
use crate::infra::postgres::PgForumRepository;
use crate::presentation::dto::{
    CreatePostRequest, CreateThreadRequest, CreateTopicRequest, PostResponse, TagResponse,
    ThreadResponse, TopicResponse, UpdatePostRequest,
};

/// Shared state for forum handlers
#[derive(Clone)]
pub struct ForumState {
    pub pool: PgPool,
    pub users: Arc<UsersConfig>,
}

impl FromRef<ForumState> for PgPool {
    fn from_ref(state: &ForumState) -> Self {
        state.pool.clone()
    }
}

fn repo(session: &PgSession) -> Arc<PgForumRepository> {
    Arc::new(PgForumRepository::new(session.clone()))
}

fn post_service(
    repo: &Arc<PgForumRepository>,
) -> PostService<PgForumRepository, PgForumRepository, PgForumRepository, PgForumRepository> {
    PostService::new(repo.clone(), repo.clone(), repo.clone(), repo.clone())
}

async fn post_response(repo: &PgForumRepository, post_id: &PostId) -> ForumResult<PostResponse> {
    repo.post_details(post_id)
        .await?
        .map(Into::into)
        .ok_or(ForumError::PostNotFound)
}

// ============================================================================
// Topics
// ============================================================================

/// GET /topics
pub async fn list_topics(
    session: PgSession,
    Query(page): Query<Page>,
) -> ForumResult<Json<Vec<TopicResponse>>> {
    let topics = TopicRepository::get_all(&*repo(&session), page).await?;
    Ok(Json(topics.into_iter().map(Into::into).collect()))
}

/// GET /topics/{topic_id}
pub async fn get_topic(
    session: PgSession,
    Path(topic_id): Path<TopicId>,
) -> ForumResult<Json<TopicResponse>> {
    let topic = TopicService::new(repo(&session)).get_topic(&topic_id).await?;
    Ok(Json(topic.into()))
}

/// GET /topics/symbol/{symbol}
pub async fn get_topic_by_symbol(
    session: PgSession,
    Path(symbol): Path<String>,
) -> ForumResult<Json<TopicResponse>> {
    let topic = TopicService::new(repo(&session))
        .get_by_symbol(&symbol)
        .await?;
    Ok(Json(topic.into()))
}

/// POST /topics
pub async fn create_topic(
    State(state): State<ForumState>,
    session: PgSession,
    bearer: BearerToken,
    Json(req): Json<CreateTopicRequest>,
) -> ForumResult<(StatusCode, Json<TopicResponse>)> {
    let actor = authenticate(&session, &state.users, &bearer).await?;

    let topic = TopicService::new(repo(&session))
        .create_topic(
            &actor,
            CreateTopicInput {
                symbol: req.symbol,
                title: req.title,
                description: req.description,
            },
        )
        .await?;
    session.commit().await?;

    Ok((StatusCode::CREATED, Json(topic.into())))
}

// ============================================================================
// Threads
// ============================================================================

/// GET /topics/{topic_id}/threads
pub async fn topic_threads(
    session: PgSession,
    Path(topic_id): Path<TopicId>,
    Query(page): Query<Page>,
) -> ForumResult<Json<Vec<ThreadResponse>>> {
    let repo = repo(&session);
    TopicService::new(repo.clone()).get_topic(&topic_id).await?;

    let threads = repo.threads_by_topic(&topic_id, page).await?;
    Ok(Json(threads.into_iter().map(Into::into).collect()))
}

/// POST /topics/{topic_id}/threads
pub async fn create_thread(
    State(state): State<ForumState>,
    session: PgSession,
    bearer: BearerToken,
    Path(topic_id): Path<TopicId>,
    Json(req): Json<CreateThreadRequest>,
) -> ForumResult<(StatusCode, Json<ThreadResponse>)> {
    let actor = authenticate(&session, &state.users, &bearer).await?;
    let repo = repo(&session);

    let thread = ThreadService::new(repo.clone(), repo.clone())
        .create_thread(
            &actor,
            &topic_id,
            CreateThreadInput {
                title: req.title,
                description: req.description,
            },
        )
        .await?;
    let details = repo
        .thread_details(&thread.thread_id)
        .await?
        .ok_or(ForumError::ThreadNotFound)?;
    session.commit().await?;

    Ok((StatusCode::CREATED, Json(details.into())))
}

/// GET /threads
pub async fn list_threads(
    session: PgSession,
    Query(page): Query<Page>,
) -> ForumResult<Json<Vec<ThreadResponse>>> {
    let threads = repo(&session).all_threads(page).await?;
    Ok(Json(threads.into_iter().map(Into::into).collect()))
}

/// GET /threads/{thread_id}
pub async fn get_thread(
    session: PgSession,
    Path(thread_id): Path<ThreadId>,
) -> ForumResult<Json<ThreadResponse>> {
    let details = repo(&session)
        .thread_details(&thread_id)
        .await?
        .ok_or(ForumError::ThreadNotFound)?;
    Ok(Json(details.into()))
}

// ============================================================================
// Posts
// ============================================================================

/// GET /topics/threads/{thread_id}/posts
pub async fn thread_posts(
    session: PgSession,
    Path(thread_id): Path<ThreadId>,
    Query(page): Query<Page>,
) -> ForumResult<Json<Vec<PostResponse>>> {
    let repo = repo(&session);
    repo.thread_details(&thread_id)
        .await?
        .ok_or(ForumError::ThreadNotFound)?;

    let posts = repo.posts_by_thread(&thread_id, page).await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

/// GET /topics/threads/posts/users/{user_id}
pub async fn user_posts(
    session: PgSession,
    Path(user_id): Path<UserId>,
    Query(page): Query<Page>,
) -> ForumResult<Json<Vec<PostResponse>>> {
    let posts = repo(&session).posts_by_user(&user_id, page).await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

/// GET /topics/threads/posts
pub async fn list_posts(
    session: PgSession,
    Query(page): Query<Page>,
) -> ForumResult<Json<Vec<PostResponse>>> {
    let posts = repo(&session).all_posts(page).await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

/// GET /topics/threads/posts/{post_id}
pub async fn get_post(
    session: PgSession,
    Path(post_id): Path<PostId>,
) -> ForumResult<Json<PostResponse>> {
    Ok(Json(post_response(&repo(&session), &post_id).await?))
}

/// POST /topics/threads/posts
pub async fn create_post(
    State(state): State<ForumState>,
    session: PgSession,
    bearer: BearerToken,
    Json(req): Json<CreatePostRequest>,
) -> ForumResult<(StatusCode, Json<PostResponse>)> {
    let actor = authenticate(&session, &state.users, &bearer).await?;
    let repo = repo(&session);

    let post = post_service(&repo)
        .create_post(
            &actor,
            CreatePostInput {
                thread_id: req.thread_id,
                title: req.title,
                content: req.content,
                tags: req.tags,
            },
        )
        .await?;
    let response = post_response(&repo, &post.post_id).await?;
    session.commit().await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /topics/threads/posts/{post_id}
pub async fn update_post(
    State(state): State<ForumState>,
    session: PgSession,
    bearer: BearerToken,
    Path(post_id): Path<PostId>,
    Json(req): Json<UpdatePostRequest>,
) -> ForumResult<Json<PostResponse>> {
    let actor = authenticate(&session, &state.users, &bearer).await?;
    let repo = repo(&session);

    post_service(&repo)
        .update_post(
            &actor,
            &post_id,
            UpdatePostInput {
                title: req.title,
                content: req.content,
                thread_id: req.thread_id,
                tags: req.tags,
                expected_version: req.expected_version,
            },
        )
        .await?;
    let response = post_response(&repo, &post_id).await?;
    session.commit().await?;

    Ok(Json(response))
}

/// DELETE /topics/threads/posts/{post_id}
pub async fn delete_post(
    State(state): State<ForumState>,
    session: PgSession,
    bearer: BearerToken,
    Path(post_id): Path<PostId>,
) -> ForumResult<StatusCode> {
    let actor = authenticate(&session, &state.users, &bearer).await?;

    post_service(&repo(&session))
        .delete_post(&actor, &post_id)
        .await?;
    session.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Tags
// ============================================================================

/// GET /tags
pub async fn list_tags(
    session: PgSession,
    Query(page): Query<Page>,
) -> ForumResult<Json<Vec<TagResponse>>> {
    let tags = TagRepository::get_all(&*repo(&session), page).await?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}
