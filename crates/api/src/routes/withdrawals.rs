//! Route definitions for the `/withdrawals` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::withdrawals;
use crate::state::AppState;

/// Routes mounted at `/withdrawals`.
///
/// ```text
/// GET    /       -> list_withdrawals (?userId=)
/// POST   /       -> create_withdrawal
/// GET    /{id}   -> get_withdrawal
/// PATCH  /{id}   -> edit_withdrawal
/// DELETE /{id}   -> delete_withdrawal
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(withdrawals::list_withdrawals).post(withdrawals::create_withdrawal),
        )
        .route(
            "/{id}",
            get(withdrawals::get_withdrawal)
                .patch(withdrawals::edit_withdrawal)
                .delete(withdrawals::delete_withdrawal),
        )
}
