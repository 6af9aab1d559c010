//! HTTP Handlers
//!
//! Each handler runs inside the request's transaction and commits it only
//! after the service call succeeded.

use axum::Form;
use axum::Json;
use axum::extract::{FromRef, Path, Query, State};
use axum::http::StatusCode;
use kernel::id::{AdminGroupId, GroupId, UserId};
use kernel::page::Page;
use kernel::session::PgSession;
use platform::bearer::BearerToken;
use sqlx::PgPool;
use std::sync::Arc;

use crate::application::{
    AuthService, CreateUserInput, LinkTelegramInput, TelegramLinkService, UpdateUserInput,
    UserService, UsersConfig,
};
use crate::domain::repository::{AdminGroupRepository, GroupRepository, UserRepository};
use crate::error::{UserError, UserResult};
use crate::infra::postgres::PgUsersRepository;
use crate::presentation::auth::authenticate;
use crate::presentation::dto::{
    CreateUserRequest, GroupResponse, LinkTelegramRequest, TelegramResponse, TokenRequest,
    TokenResponse, UpdateUserRequest, UserResponse,
};

/// Shared state for users handlers
#[derive(Clone)]
pub struct UsersState {
    pub pool: PgPool,
    pub config: Arc<UsersConfig>,
}

impl FromRef<UsersState> for PgPool {
    fn from_ref(state: &UsersState) -> Self {
        state.pool.clone()
    }
}

fn repo(session: &PgSession) -> Arc<PgUsersRepository> {
    Arc::new(PgUsersRepository::new(session.clone()))
}

// ============================================================================
// Token
// ============================================================================

/// POST /token
pub async fn issue_token(
    State(state): State<UsersState>,
    session: PgSession,
    Form(req): Form<TokenRequest>,
) -> UserResult<Json<TokenResponse>> {
    let service = AuthService::new(repo(&session), state.config.clone());

    let user = service
        .authenticate(&req.username, &req.password)
        .await?
        .ok_or(UserError::InvalidCredentials)?;
    let token = service.issue_session_token(&user)?;

    // Commits a password hash upgrade, if login made one
    session.commit().await?;

    Ok(Json(TokenResponse::bearer(token)))
}

// ============================================================================
// Users
// ============================================================================

/// POST /users
pub async fn create_user(
    State(state): State<UsersState>,
    session: PgSession,
    Json(req): Json<CreateUserRequest>,
) -> UserResult<(StatusCode, Json<UserResponse>)> {
    let service = UserService::new(repo(&session), state.config.clone());

    let user = service
        .create_user(CreateUserInput {
            username: req.username,
            email: req.email,
            password: req.password,
            gender: req.gender,
        })
        .await?;
    session.commit().await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users/me
pub async fn me(
    State(state): State<UsersState>,
    session: PgSession,
    bearer: BearerToken,
) -> UserResult<Json<UserResponse>> {
    let user = authenticate(&session, &state.config, &bearer).await?;
    Ok(Json(user.into()))
}

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<UsersState>,
    session: PgSession,
    bearer: BearerToken,
    Path(user_id): Path<UserId>,
) -> UserResult<Json<UserResponse>> {
    authenticate(&session, &state.config, &bearer).await?;

    let user = UserService::new(repo(&session), state.config.clone())
        .get_user(&user_id)
        .await?;

    Ok(Json(user.into()))
}

/// PUT /users/{user_id}
pub async fn update_user(
    State(state): State<UsersState>,
    session: PgSession,
    bearer: BearerToken,
    Path(user_id): Path<UserId>,
    Json(req): Json<UpdateUserRequest>,
) -> UserResult<Json<UserResponse>> {
    let actor = authenticate(&session, &state.config, &bearer).await?;

    let user = UserService::new(repo(&session), state.config.clone())
        .update_user(
            &actor,
            &user_id,
            UpdateUserInput {
                username: req.username,
                email: req.email,
                password: req.password,
                gender: req.gender,
                group_id: req.group_id,
                expected_version: req.expected_version,
            },
        )
        .await?;
    session.commit().await?;

    Ok(Json(user.into()))
}

/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<UsersState>,
    session: PgSession,
    bearer: BearerToken,
    Path(user_id): Path<UserId>,
) -> UserResult<StatusCode> {
    let actor = authenticate(&session, &state.config, &bearer).await?;

    UserService::new(repo(&session), state.config.clone())
        .delete_user(&actor, &user_id)
        .await?;
    session.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Telegram
// ============================================================================

/// PUT /users/{user_id}/telegram
pub async fn link_telegram(
    State(state): State<UsersState>,
    session: PgSession,
    bearer: BearerToken,
    Path(user_id): Path<UserId>,
    Json(req): Json<LinkTelegramRequest>,
) -> UserResult<Json<TelegramResponse>> {
    let actor = authenticate(&session, &state.config, &bearer).await?;

    let integration = TelegramLinkService::new(repo(&session))
        .link(
            &actor,
            &user_id,
            LinkTelegramInput {
                telegram_id: req.telegram_id,
                telegram_username: req.telegram_username,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;
    session.commit().await?;

    Ok(Json(integration.into()))
}

/// DELETE /users/{user_id}/telegram
pub async fn unlink_telegram(
    State(state): State<UsersState>,
    session: PgSession,
    bearer: BearerToken,
    Path(user_id): Path<UserId>,
) -> UserResult<StatusCode> {
    let actor = authenticate(&session, &state.config, &bearer).await?;

    TelegramLinkService::new(repo(&session))
        .unlink(&actor, &user_id)
        .await?;
    session.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Groups (read-only)
// ============================================================================

/// GET /groups
pub async fn list_groups(
    session: PgSession,
    Query(page): Query<Page>,
) -> UserResult<Json<Vec<GroupResponse>>> {
    let groups = GroupRepository::get_all(&*repo(&session), page).await?;
    Ok(Json(groups.into_iter().map(Into::into).collect()))
}

/// GET /groups/{group_id}
pub async fn get_group(
    session: PgSession,
    Path(group_id): Path<GroupId>,
) -> UserResult<Json<GroupResponse>> {
    let group = GroupRepository::get(&*repo(&session), &group_id)
        .await?
        .ok_or(UserError::GroupNotFound)?;
    Ok(Json(group.into()))
}

/// GET /groups/{group_id}/members
pub async fn group_members(
    session: PgSession,
    Path(group_id): Path<GroupId>,
    Query(page): Query<Page>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let repo = repo(&session);
    GroupRepository::get(&*repo, &group_id)
        .await?
        .ok_or(UserError::GroupNotFound)?;

    let users = UserRepository::get_by_group(&*repo, &group_id, page).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// GET /admin-groups
pub async fn list_admin_groups(
    session: PgSession,
    Query(page): Query<Page>,
) -> UserResult<Json<Vec<GroupResponse>>> {
    let groups = AdminGroupRepository::get_all(&*repo(&session), page).await?;
    Ok(Json(groups.into_iter().map(Into::into).collect()))
}

/// GET /admin-groups/{admin_group_id}
pub async fn get_admin_group(
    session: PgSession,
    Path(admin_group_id): Path<AdminGroupId>,
) -> UserResult<Json<GroupResponse>> {
    let group = AdminGroupRepository::get(&*repo(&session), &admin_group_id)
        .await?
        .ok_or(UserError::GroupNotFound)?;
    Ok(Json(group.into()))
}

/// GET /admin-groups/{admin_group_id}/members
pub async fn admin_group_members(
    session: PgSession,
    Path(admin_group_id): Path<AdminGroupId>,
    Query(page): Query<Page>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let repo = repo(&session);
    AdminGroupRepository::get(&*repo, &admin_group_id)
        .await?
        .ok_or(UserError::GroupNotFound)?;

    let users = UserRepository::get_by_admin_group(&*repo, &admin_group_id, page).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}
