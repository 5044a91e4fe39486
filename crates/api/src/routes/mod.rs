pub mod auth;
pub mod deposit_actions;
pub mod deposits;
pub mod exchanges;
pub mod health;
pub mod users;
pub mod withdrawal_actions;
pub mod withdrawals;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
///
/// /users                                       list, create (admin)
/// /users/by-username/{username}                lookup (admin)
/// /users/{id}                                  get, admin edit, delete (admin); self edit
/// /users/{id}/password                         change password (self or admin)
/// /users/{id}/reset-token                      issue reset token (admin)
/// /users/{id}/password-reset                   reset with token (public)
///
/// /exchanges                                   list (?userId=), create
/// /exchanges/{id}                              get, edit, delete
/// /exchanges/{id}/deposit-actions              actions of an exchange
/// /exchanges/{id}/withdrawal-actions           actions of an exchange
///
/// /deposit-actions                             list (?userId=), create
/// /deposit-actions/{id}                        get, edit, delete
/// /deposit-actions/{id}/deposits               deposits of an action
///
/// /withdrawal-actions                          list (?userId=), create
/// /withdrawal-actions/{id}                     get, edit, delete
/// /withdrawal-actions/{id}/withdrawals         withdrawals of an action
///
/// /deposits                                    list (?userId=), create
/// /deposits/{id}                               get, edit, delete
///
/// /withdrawals                                 list (?userId=), create
/// /withdrawals/{id}                            get, edit, delete
/// ```
///
/// Every route except login and password reset requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/exchanges", exchanges::router())
        .nest("/deposit-actions", deposit_actions::router())
        .nest("/withdrawal-actions", withdrawal_actions::router())
        .nest("/deposits", deposits::router())
        .nest("/withdrawals", withdrawals::router())
}
