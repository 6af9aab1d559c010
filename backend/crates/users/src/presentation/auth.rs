//! Bearer authentication for handlers
//!
//! Shared with the forum and market routers: they resolve the acting user
//! through the same request session before calling their services.

use std::sync::Arc;

use kernel::session::PgSession;
use platform::bearer::BearerToken;

use crate::application::{AuthService, UsersConfig};
use crate::domain::entity::user::User;
use crate::error::{UserError, UserResult};
use crate::infra::postgres::PgUsersRepository;

/// Resolve the bearer token to a user, or fail with `Unauthenticated`
pub async fn authenticate(
    session: &PgSession,
    config: &Arc<UsersConfig>,
    bearer: &BearerToken,
) -> UserResult<User> {
    let repo = Arc::new(PgUsersRepository::new(session.clone()));
    AuthService::new(repo, config.clone())
        .resolve_user_from_token(bearer.as_str())
        .await?
        .ok_or(UserError::Unauthenticated)
}
