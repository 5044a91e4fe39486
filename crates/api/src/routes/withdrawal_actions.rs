//! Route definitions for the `/withdrawal-actions` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::withdrawal_actions;
use crate::state::AppState;

/// Routes mounted at `/withdrawal-actions`.
///
/// ```text
/// GET    /                  -> list_withdrawal_actions (?userId=)
/// POST   /                  -> create_withdrawal_action
/// GET    /{id}              -> get_withdrawal_action
/// PATCH  /{id}              -> edit_withdrawal_action
/// DELETE /{id}              -> delete_withdrawal_action (cascades)
/// GET    /{id}/withdrawals  -> list_withdrawals
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(withdrawal_actions::list_withdrawal_actions)
                .post(withdrawal_actions::create_withdrawal_action),
        )
        .route(
            "/{id}",
            get(withdrawal_actions::get_withdrawal_action)
                .patch(withdrawal_actions::edit_withdrawal_action)
                .delete(withdrawal_actions::delete_withdrawal_action),
        )
        .route("/{id}/withdrawals", get(withdrawal_actions::list_withdrawals))
}
