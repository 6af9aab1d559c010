//! Service-level tests against the in-memory repository

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use kernel::page::Page;
use platform::password::HashingPolicy;
use platform::token::{Claims, TokenCodec};
use serde_json::Value;

use crate::application::{
    AuthService, CreateUserInput, LinkTelegramInput, TelegramLinkService, UpdateUserInput,
    UserService, UsersConfig,
};
use crate::domain::entity::group::Group;
use crate::domain::repository::{GroupRepository, TelegramIntegrationRepository, UserRepository};
use crate::domain::value_object::gender::Gender;
use crate::error::UserError;
use crate::infra::memory::MemoryUsersRepository;
use crate::User;

fn config() -> Arc<UsersConfig> {
    Arc::new(UsersConfig::new(
        HashingPolicy::default().with_cost(1024, 1, 1).unwrap(),
        TokenCodec::hs256(b"test-secret".to_vec()),
        Duration::from_secs(60),
    ))
}

struct Fixture {
    repo: Arc<MemoryUsersRepository>,
    users: UserService<MemoryUsersRepository>,
    auth: AuthService<MemoryUsersRepository>,
    telegram: TelegramLinkService<MemoryUsersRepository>,
}

fn fixture() -> Fixture {
    let repo = Arc::new(MemoryUsersRepository::default());
    let config = config();
    Fixture {
        users: UserService::new(repo.clone(), config.clone()),
        auth: AuthService::new(repo.clone(), config),
        telegram: TelegramLinkService::new(repo.clone()),
        repo,
    }
}

fn input(username: &str, email: &str) -> CreateUserInput {
    CreateUserInput {
        username: username.to_string(),
        email: email.to_string(),
        password: "secret1".to_string(),
        gender: None,
    }
}

async fn create(f: &Fixture, username: &str) -> User {
    f.users
        .create_user(input(username, &format!("{username}@example.com")))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_register_login_and_resolve_token() {
    let f = fixture();
    let alice = f
        .users
        .create_user(CreateUserInput {
            gender: Some("female".to_string()),
            ..input("alice", "alice@example.com")
        })
        .await
        .unwrap();
    assert_eq!(alice.gender, Gender::Female);
    assert_eq!(alice.version, 1);

    let authed = f.auth.authenticate("alice", "secret1").await.unwrap().unwrap();
    assert_eq!(authed.user_id, alice.user_id);

    let token = f.auth.issue_session_token(&authed).unwrap();
    let resolved = f.auth.resolve_user_from_token(&token).await.unwrap().unwrap();
    assert_eq!(resolved.user_id, alice.user_id);
    assert_eq!(resolved.username.as_str(), "alice");
}

#[tokio::test]
async fn test_login_upgrades_outdated_hash() {
    let f = fixture();
    let alice = create(&f, "alice").await;

    let stronger = Arc::new(UsersConfig::new(
        HashingPolicy::default().with_cost(2048, 1, 1).unwrap(),
        TokenCodec::hs256(b"test-secret".to_vec()),
        Duration::from_secs(60),
    ));
    assert!(alice.password_needs_rehash(&stronger.hashing));

    let auth = AuthService::new(f.repo.clone(), stronger.clone());
    let authed = auth.authenticate("alice", "secret1").await.unwrap().unwrap();
    assert_eq!(authed.version, 2);

    let stored = UserRepository::get(&*f.repo, &alice.user_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.password_needs_rehash(&stronger.hashing));
    assert!(auth.authenticate("alice", "secret1").await.unwrap().is_some());

    // Already current: no write
    let again = auth.authenticate("alice", "secret1").await.unwrap().unwrap();
    assert_eq!(again.version, 2);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user() {
    let f = fixture();
    create(&f, "alice").await;

    assert!(f.auth.authenticate("alice", "secret2").await.unwrap().is_none());
    assert!(f.auth.authenticate("bob", "secret1").await.unwrap().is_none());
    assert!(f.auth.authenticate("alice", "").await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_duplicate_username() {
    let f = fixture();

    let (first, second) = tokio::join!(
        f.users.create_user(input("alice", "a1@example.com")),
        f.users.create_user(input("alice", "a2@example.com")),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(UserError::UsernameTaken)))
    );
    assert_eq!(UserRepository::get_all(&*f.repo, Page::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_email() {
    let f = fixture();
    create(&f, "alice").await;

    let err = f
        .users
        .create_user(input("bob", "alice@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::EmailTaken));
}

#[tokio::test]
async fn test_invalid_gender_rejected_before_write() {
    let f = fixture();

    let err = f
        .users
        .create_user(CreateUserInput {
            gender: Some("robot".to_string()),
            ..input("alice", "alice@example.com")
        })
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::InvalidGender(_)));
    assert!(
        UserRepository::get_all(&*f.repo, Page::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_partial_update() {
    let f = fixture();
    let alice = create(&f, "alice").await;

    let updated = f
        .users
        .update_user(
            &alice,
            &alice.user_id,
            UpdateUserInput {
                email: Some("new@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.email.as_str(), "new@example.com");
    assert_eq!(updated.username.as_str(), "alice");
    assert_eq!(updated.version, 2);

    // Password untouched
    assert!(f.auth.authenticate("alice", "secret1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_update_password_and_group() {
    let f = fixture();
    let alice = create(&f, "alice").await;
    let group = Group::new("readers", None).unwrap();
    GroupRepository::add(&*f.repo, &group).await.unwrap();

    let updated = f
        .users
        .update_user(
            &alice,
            &alice.user_id,
            UpdateUserInput {
                password: Some("secret2".to_string()),
                group_id: Some(Some(group.group_id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.group_id, Some(group.group_id));

    assert!(f.auth.authenticate("alice", "secret1").await.unwrap().is_none());
    assert!(f.auth.authenticate("alice", "secret2").await.unwrap().is_some());

    let members = UserRepository::get_by_group(&*f.repo, &group.group_id, Page::default())
        .await
        .unwrap();
    assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn test_expected_version_mismatch() {
    let f = fixture();
    let alice = create(&f, "alice").await;

    let err = f
        .users
        .update_user(
            &alice,
            &alice.user_id,
            UpdateUserInput {
                username: Some("alicia".to_string()),
                expected_version: Some(7),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::Conflict));

    let stored = f.users.get_user(&alice.user_id).await.unwrap();
    assert_eq!(stored.username.as_str(), "alice");
}

#[tokio::test]
async fn test_update_rename_to_taken_username() {
    let f = fixture();
    let alice = create(&f, "alice").await;
    create(&f, "bob").await;

    let err = f
        .users
        .update_user(
            &alice,
            &alice.user_id,
            UpdateUserInput {
                username: Some("bob".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::UsernameTaken));
}

#[tokio::test]
async fn test_other_user_cannot_update_or_delete() {
    let f = fixture();
    let alice = create(&f, "alice").await;
    let bob = create(&f, "bob").await;

    let err = f
        .users
        .update_user(
            &bob,
            &alice.user_id,
            UpdateUserInput {
                email: Some("bob@evil.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::Forbidden));

    let err = f.users.delete_user(&bob, &alice.user_id).await.unwrap_err();
    assert!(matches!(err, UserError::Forbidden));
    assert!(f.users.get_user(&alice.user_id).await.is_ok());
}

#[tokio::test]
async fn test_delete_self() {
    let f = fixture();
    let alice = create(&f, "alice").await;

    f.users.delete_user(&alice, &alice.user_id).await.unwrap();
    assert!(matches!(
        f.users.get_user(&alice.user_id).await,
        Err(UserError::NotFound)
    ));
    assert!(matches!(
        f.users.delete_user(&alice, &alice.user_id).await,
        Err(UserError::NotFound)
    ));
}

#[tokio::test]
async fn test_deleted_user_token_resolves_to_none() {
    let f = fixture();
    let alice = create(&f, "alice").await;
    let token = f.auth.issue_session_token(&alice).unwrap();

    f.users.delete_user(&alice, &alice.user_id).await.unwrap();
    assert!(f.auth.resolve_user_from_token(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_expired_or_foreign_token_resolves_to_none() {
    let f = fixture();
    let alice = create(&f, "alice").await;

    let mut claims = Claims::new();
    claims.insert("sub".to_string(), Value::String(alice.user_id.to_string()));
    claims.insert("exp".to_string(), Value::from(Utc::now().timestamp() - 10));
    let expired = TokenCodec::hs256(b"test-secret".to_vec())
        .issue(&claims, None)
        .unwrap();
    assert!(f.auth.resolve_user_from_token(&expired).await.unwrap().is_none());

    claims.insert("exp".to_string(), Value::from(Utc::now().timestamp() + 60));
    let foreign = TokenCodec::hs256(b"other".to_vec())
        .issue(&claims, None)
        .unwrap();
    assert!(f.auth.resolve_user_from_token(&foreign).await.unwrap().is_none());

    assert!(f.auth.resolve_user_from_token("garbage").await.unwrap().is_none());
}

#[tokio::test]
async fn test_telegram_link_relink_and_unlink() {
    let f = fixture();
    let alice = create(&f, "alice").await;
    let bob = create(&f, "bob").await;

    let linked = f
        .telegram
        .link(
            &alice,
            &alice.user_id,
            LinkTelegramInput {
                telegram_id: 42,
                telegram_username: Some("@alice_tg".to_string()),
                first_name: Some("Alice".to_string()),
                last_name: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(linked.telegram_username.as_deref(), Some("alice_tg"));

    let relinked = f
        .telegram
        .link(
            &alice,
            &alice.user_id,
            LinkTelegramInput {
                telegram_id: 43,
                telegram_username: None,
                first_name: None,
                last_name: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(relinked.telegram_id, 43);
    assert_eq!(relinked.version, 2);

    let err = f
        .telegram
        .link(
            &bob,
            &bob.user_id,
            LinkTelegramInput {
                telegram_id: 43,
                telegram_username: None,
                first_name: None,
                last_name: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::TelegramAlreadyLinked));

    let err = f.telegram.unlink(&bob, &alice.user_id).await.unwrap_err();
    assert!(matches!(err, UserError::Forbidden));

    f.telegram.unlink(&alice, &alice.user_id).await.unwrap();
    assert!(
        TelegramIntegrationRepository::get(&*f.repo, &alice.user_id)
            .await
            .unwrap()
            .is_none()
    );
}
