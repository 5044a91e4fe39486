//! Handlers for the `/withdrawal-actions` resource.

use action_bank_core::bank::WithdrawalActionEdits;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::OwnerQuery;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::resolvers::withdrawal;
use crate::resolvers::withdrawal_action::{self, AddWithdrawalActionInput};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/withdrawal-actions?userId=
pub async fn list_withdrawal_actions(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<impl IntoResponse> {
    let owner = query.owner(&caller);
    let actions =
        withdrawal_action::get_withdrawal_actions_by_user_id(&state, &caller, owner).await?;
    Ok(Json(DataResponse { data: actions }))
}

/// GET /api/v1/withdrawal-actions/{id}
pub async fn get_withdrawal_action(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let action = withdrawal_action::get_withdrawal_action_by_id(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: action }))
}

/// POST /api/v1/withdrawal-actions
pub async fn create_withdrawal_action(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<AddWithdrawalActionInput>,
) -> AppResult<impl IntoResponse> {
    let action = withdrawal_action::add_withdrawal_action(&state, &caller, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: action })))
}

/// PATCH /api/v1/withdrawal-actions/{id}
pub async fn edit_withdrawal_action(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(edits): Json<WithdrawalActionEdits>,
) -> AppResult<impl IntoResponse> {
    let action = withdrawal_action::edit_withdrawal_action(&state, &caller, &id, edits).await?;
    Ok(Json(DataResponse { data: action }))
}

/// DELETE /api/v1/withdrawal-actions/{id}
pub async fn delete_withdrawal_action(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = withdrawal_action::delete_withdrawal_action(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: deleted }))
}

/// GET /api/v1/withdrawal-actions/{id}/withdrawals
pub async fn list_withdrawals(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let withdrawals =
        withdrawal::get_withdrawals_by_withdrawal_action_id(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: withdrawals }))
}
