//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                         -> list_users (admin)
/// POST   /                         -> create_user (admin)
/// GET    /by-username/{username}   -> get_user_by_username (admin)
/// GET    /{id}                     -> get_user (admin)
/// PATCH  /{id}                     -> edit_user (self)
/// PUT    /{id}                     -> admin_edit_user (admin)
/// DELETE /{id}                     -> delete_user (admin)
/// POST   /{id}/password            -> update_password (self or admin)
/// POST   /{id}/reset-token         -> create_reset_token (admin)
/// POST   /{id}/password-reset      -> reset_password (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/by-username/{username}", get(users::get_user_by_username))
        .route(
            "/{id}",
            get(users::get_user)
                .patch(users::edit_user)
                .put(users::admin_edit_user)
                .delete(users::delete_user),
        )
        .route("/{id}/password", post(users::update_password))
        .route("/{id}/reset-token", post(users::create_reset_token))
        .route("/{id}/password-reset", post(users::reset_password))
}
