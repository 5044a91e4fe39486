//! Route definitions for the `/exchanges` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::exchanges;
use crate::state::AppState;

/// Routes mounted at `/exchanges`.
///
/// ```text
/// GET    /                          -> list_exchanges (?userId=)
/// POST   /                          -> create_exchange
/// GET    /{id}                      -> get_exchange
/// PATCH  /{id}                      -> edit_exchange
/// DELETE /{id}                      -> delete_exchange (cascades)
/// GET    /{id}/deposit-actions      -> list_deposit_actions
/// GET    /{id}/withdrawal-actions   -> list_withdrawal_actions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(exchanges::list_exchanges).post(exchanges::create_exchange),
        )
        .route(
            "/{id}",
            get(exchanges::get_exchange)
                .patch(exchanges::edit_exchange)
                .delete(exchanges::delete_exchange),
        )
        .route("/{id}/deposit-actions", get(exchanges::list_deposit_actions))
        .route(
            "/{id}/withdrawal-actions",
            get(exchanges::list_withdrawal_actions),
        )
}
