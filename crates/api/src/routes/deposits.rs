//! Route definitions for the `/deposits` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::deposits;
use crate::state::AppState;

/// Routes mounted at `/deposits`.
///
/// ```text
/// GET    /       -> list_deposits (?userId=)
/// POST   /       -> create_deposit
/// GET    /{id}   -> get_deposit
/// PATCH  /{id}   -> edit_deposit
/// DELETE /{id}   -> delete_deposit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(deposits::list_deposits).post(deposits::create_deposit),
        )
        .route(
            "/{id}",
            get(deposits::get_deposit)
                .patch(deposits::edit_deposit)
                .delete(deposits::delete_deposit),
        )
}
