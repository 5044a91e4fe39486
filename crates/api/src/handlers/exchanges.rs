//! Handlers for the `/exchanges` resource.

use action_bank_core::bank::ExchangeEdits;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::OwnerQuery;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::resolvers::exchange::{self, AddExchangeInput};
use crate::resolvers::{deposit_action, withdrawal_action};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/exchanges?userId=
pub async fn list_exchanges(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<impl IntoResponse> {
    let exchanges =
        exchange::get_exchanges_by_user_id(&state, &caller, query.owner(&caller)).await?;
    Ok(Json(DataResponse { data: exchanges }))
}

/// GET /api/v1/exchanges/{id}
///
/// The exchange with its actions, transactions and balances.
pub async fn get_exchange(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let exchange = exchange::get_exchange_by_id(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: exchange }))
}

/// POST /api/v1/exchanges
pub async fn create_exchange(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<AddExchangeInput>,
) -> AppResult<impl IntoResponse> {
    let exchange = exchange::add_exchange(&state, &caller, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: exchange })))
}

/// PATCH /api/v1/exchanges/{id}
pub async fn edit_exchange(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(edits): Json<ExchangeEdits>,
) -> AppResult<impl IntoResponse> {
    let exchange = exchange::edit_exchange(&state, &caller, &id, edits).await?;
    Ok(Json(DataResponse { data: exchange }))
}

/// DELETE /api/v1/exchanges/{id}
///
/// Cascades to every action and transaction of the exchange.
pub async fn delete_exchange(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = exchange::delete_exchange(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: deleted }))
}

/// GET /api/v1/exchanges/{id}/deposit-actions
pub async fn list_deposit_actions(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let actions = deposit_action::get_deposit_actions_by_exchange_id(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: actions }))
}

/// GET /api/v1/exchanges/{id}/withdrawal-actions
pub async fn list_withdrawal_actions(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let actions =
        withdrawal_action::get_withdrawal_actions_by_exchange_id(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: actions }))
}
