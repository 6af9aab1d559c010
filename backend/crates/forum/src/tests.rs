//! Service-level tests against the in-memory repository

use std::sync::Arc;

use kernel::id::{AdminGroupId, PostId, ThreadId};
use kernel::page::Page;
use platform::password::HashingPolicy;
use users::User;
use users::domain::value_object::{
    email::Email,
    gender::Gender,
    user_password::{RawPassword, UserPassword},
    username::Username,
};

use crate::application::{
    CreatePostInput, CreateThreadInput, CreateTopicInput, PostService, ThreadService,
    TopicService, UpdatePostInput,
};
use crate::domain::entity::thread::Thread;
use crate::domain::repository::{PostRepository, PostTagRepository, TagRepository};
use crate::error::ForumError;
use crate::infra::memory::MemoryForumRepository;

type Posts = PostService<
    MemoryForumRepository,
    MemoryForumRepository,
    MemoryForumRepository,
    MemoryForumRepository,
>;

fn user(name: &str) -> User {
    let policy = HashingPolicy::default().with_cost(1024, 1, 1).unwrap();
    let raw = RawPassword::new("secret1".to_string()).unwrap();
    User::new(
        Username::new(name).unwrap(),
        Email::new(format!("{name}@example.com")).unwrap(),
        UserPassword::from_raw(&raw, &policy).unwrap(),
        Gender::Other,
    )
}

fn admin(name: &str) -> User {
    let mut user = user(name);
    user.set_admin_group(Some(AdminGroupId::new()));
    user
}

struct Fixture {
    repo: Arc<MemoryForumRepository>,
    topics: TopicService<MemoryForumRepository>,
    threads: ThreadService<MemoryForumRepository, MemoryForumRepository>,
    posts: Posts,
}

fn fixture() -> Fixture {
    let repo = Arc::new(MemoryForumRepository::default());
    Fixture {
        topics: TopicService::new(repo.clone()),
        threads: ThreadService::new(repo.clone(), repo.clone()),
        posts: PostService::new(repo.clone(), repo.clone(), repo.clone(), repo.clone()),
        repo,
    }
}

async fn thread(f: &Fixture) -> Thread {
    let admin = admin("root");
    let topic = f
        .topics
        .create_topic(
            &admin,
            CreateTopicInput {
                symbol: "gen".to_string(),
                title: "General".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

    f.threads
        .create_thread(
            &admin,
            &topic.topic_id,
            CreateThreadInput {
                title: "Introductions".to_string(),
                description: Some("Say hi".to_string()),
            },
        )
        .await
        .unwrap()
}

fn post_input(thread_id: ThreadId, tags: &[&str]) -> CreatePostInput {
    CreatePostInput {
        thread_id,
        title: "Hello".to_string(),
        content: "First post".to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

async fn tag_names(f: &Fixture, post_id: &PostId) -> Vec<String> {
    let mut names = Vec::new();
    for link in f.repo.get_by_post(post_id).await.unwrap() {
        let tag = TagRepository::get(&*f.repo, &link.tag_id)
            .await
            .unwrap()
            .unwrap();
        names.push(tag.name.as_str().to_string());
    }
    names.sort();
    names
}

#[tokio::test]
async fn test_topic_requires_admin() {
    let f = fixture();
    let alice = user("alice");

    let err = f
        .topics
        .create_topic(
            &alice,
            CreateTopicInput {
                symbol: "off".to_string(),
                title: "Off-topic".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::Unauthorized));
}

#[tokio::test]
async fn test_topic_symbol_unique_and_uppercased() {
    let f = fixture();
    let thread = thread(&f).await;
    let topic = f.topics.get_by_symbol("gen").await.unwrap();
    assert_eq!(topic.symbol.as_str(), "GEN");
    assert_eq!(topic.topic_id, thread.topic_id);

    let err = f
        .topics
        .create_topic(
            &admin("other"),
            CreateTopicInput {
                symbol: "GEN".to_string(),
                title: "Again".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::SymbolTaken));
}

#[tokio::test]
async fn test_thread_requires_topic() {
    let f = fixture();

    let err = f
        .threads
        .create_thread(
            &user("alice"),
            &kernel::id::TopicId::new(),
            CreateThreadInput {
                title: "Orphan".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::TopicNotFound));
}

#[tokio::test]
async fn test_post_author_is_actor() {
    let f = fixture();
    let thread = thread(&f).await;
    let alice = user("alice");

    let post = f
        .posts
        .create_post(&alice, post_input(thread.thread_id, &[]))
        .await
        .unwrap();
    assert_eq!(post.user_id, alice.user_id);

    let by_alice = f
        .repo
        .get_by_user(&alice.user_id, Page::default())
        .await
        .unwrap();
    assert_eq!(by_alice.len(), 1);
}

#[tokio::test]
async fn test_post_requires_thread() {
    let f = fixture();

    let err = f
        .posts
        .create_post(&user("alice"), post_input(ThreadId::new(), &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::ThreadNotFound));
    assert!(
        PostRepository::get_all(&*f.repo, Page::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_tags_created_once_and_normalized() {
    let f = fixture();
    let thread = thread(&f).await;
    let alice = user("alice");

    let first = f
        .posts
        .create_post(&alice, post_input(thread.thread_id, &[" Rust ", "async", "rust"]))
        .await
        .unwrap();
    let second = f
        .posts
        .create_post(&alice, post_input(thread.thread_id, &["RUST"]))
        .await
        .unwrap();

    assert_eq!(tag_names(&f, &first.post_id).await, vec!["async", "rust"]);
    assert_eq!(tag_names(&f, &second.post_id).await, vec!["rust"]);
    assert_eq!(
        TagRepository::get_all(&*f.repo, Page::default())
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn test_other_user_cannot_delete_post() {
    let f = fixture();
    let thread = thread(&f).await;
    let alice = user("alice");
    let bob = user("bob");

    let post = f
        .posts
        .create_post(&alice, post_input(thread.thread_id, &["intro"]))
        .await
        .unwrap();

    let err = f.posts.delete_post(&bob, &post.post_id).await.unwrap_err();
    assert!(matches!(err, ForumError::Unauthorized));
    assert!(PostRepository::get(&*f.repo, &post.post_id).await.unwrap().is_some());
    assert_eq!(tag_names(&f, &post.post_id).await, vec!["intro"]);

    f.posts.delete_post(&alice, &post.post_id).await.unwrap();
    assert!(PostRepository::get(&*f.repo, &post.post_id).await.unwrap().is_none());
    assert!(f.repo.get_by_post(&post.post_id).await.unwrap().is_empty());

    let err = f.posts.delete_post(&alice, &post.post_id).await.unwrap_err();
    assert!(matches!(err, ForumError::PostNotFound));
}

#[tokio::test]
async fn test_other_user_cannot_update_post() {
    let f = fixture();
    let thread = thread(&f).await;
    let alice = user("alice");
    let bob = user("bob");

    let post = f
        .posts
        .create_post(&alice, post_input(thread.thread_id, &[]))
        .await
        .unwrap();

    let err = f
        .posts
        .update_post(
            &bob,
            &post.post_id,
            UpdatePostInput {
                content: Some("defaced".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::Unauthorized));

    let stored = PostRepository::get(&*f.repo, &post.post_id).await.unwrap().unwrap();
    assert_eq!(stored.content, "First post");
}

#[tokio::test]
async fn test_author_partial_update_and_retag() {
    let f = fixture();
    let thread = thread(&f).await;
    let alice = user("alice");

    let post = f
        .posts
        .create_post(&alice, post_input(thread.thread_id, &["old"]))
        .await
        .unwrap();

    let updated = f
        .posts
        .update_post(
            &alice,
            &post.post_id,
            UpdatePostInput {
                content: Some("Edited".to_string()),
                tags: Some(vec!["New".to_string()]),
                expected_version: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Hello");
    assert_eq!(updated.content, "Edited");
    assert_eq!(updated.version, 2);
    assert_eq!(tag_names(&f, &post.post_id).await, vec!["new"]);

    let err = f
        .posts
        .update_post(
            &alice,
            &post.post_id,
            UpdatePostInput {
                title: Some("Stale".to_string()),
                expected_version: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::Conflict));
}

#[tokio::test]
async fn test_update_missing_post() {
    let f = fixture();

    let err = f
        .posts
        .update_post(&user("alice"), &PostId::new(), UpdatePostInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::PostNotFound));
}

#[tokio::test]
async fn test_invalid_title_rejected() {
    let f = fixture();
    let thread = thread(&f).await;

    let err = f
        .posts
        .create_post(
            &user("alice"),
            CreatePostInput {
                title: "x".repeat(256),
                ..post_input(thread.thread_id, &[])
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ForumError::Validation(_)));
}
