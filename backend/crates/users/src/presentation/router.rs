use axum::{
    Router,
    routing::{get, post, put},
};

pub use super::handlers::UsersState;
use super::handlers::{
    admin_group_members, create_user, delete_user, get_admin_group, get_group, get_user,
    group_members, issue_token, link_telegram, list_admin_groups, list_groups, me,
    unlink_telegram, update_user,
};

/// Build the users router
pub fn users_router(state: UsersState) -> Router {
    Router::new()
        .route("/token", post(issue_token))
        .route("/users", post(create_user))
        .route("/users/me", get(me))
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route(
            "/users/{user_id}/telegram",
            put(link_telegram).delete(unlink_telegram),
        )
        .route("/groups", get(list_groups))
        .route("/groups/{group_id}", get(get_group))
        .route("/groups/{group_id}/members", get(group_members))
        .route("/admin-groups", get(list_admin_groups))
        .route("/admin-groups/{admin_group_id}", get(get_admin_group))
        .route(
            "/admin-groups/{admin_group_id}/members",
            get(admin_group_members),
        )
        .with_state(state)
}
