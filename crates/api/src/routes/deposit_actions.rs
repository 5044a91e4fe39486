//! Route definitions for the `/deposit-actions` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::deposit_actions;
use crate::state::AppState;

/// Routes mounted at `/deposit-actions`.
///
/// ```text
/// GET    /                 -> list_deposit_actions (?userId=)
/// POST   /                 -> create_deposit_action
/// GET    /{id}             -> get_deposit_action
/// PATCH  /{id}             -> edit_deposit_action
/// DELETE /{id}             -> delete_deposit_action (cascades)
/// GET    /{id}/deposits    -> list_deposits
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(deposit_actions::list_deposit_actions)
                .post(deposit_actions::create_deposit_action),
        )
        .route(
            "/{id}",
            get(deposit_actions::get_deposit_action)
                .patch(deposit_actions::edit_deposit_action)
                .delete(deposit_actions::delete_deposit_action),
        )
        .route("/{id}/deposits", get(deposit_actions::list_deposits))
}
