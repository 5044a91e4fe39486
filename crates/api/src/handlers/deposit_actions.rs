//! Handlers for the `/deposit-actions` resource.

use action_bank_core::bank::DepositActionEdits;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::OwnerQuery;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::resolvers::deposit;
use crate::resolvers::deposit_action::{self, AddDepositActionInput};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/deposit-actions?userId=
pub async fn list_deposit_actions(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<impl IntoResponse> {
    let actions =
        deposit_action::get_deposit_actions_by_user_id(&state, &caller, query.owner(&caller))
            .await?;
    Ok(Json(DataResponse { data: actions }))
}

/// GET /api/v1/deposit-actions/{id}
pub async fn get_deposit_action(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let action = deposit_action::get_deposit_action_by_id(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: action }))
}

/// POST /api/v1/deposit-actions
pub async fn create_deposit_action(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<AddDepositActionInput>,
) -> AppResult<impl IntoResponse> {
    let action = deposit_action::add_deposit_action(&state, &caller, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: action })))
}

/// PATCH /api/v1/deposit-actions/{id}
pub async fn edit_deposit_action(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(edits): Json<DepositActionEdits>,
) -> AppResult<impl IntoResponse> {
    let action = deposit_action::edit_deposit_action(&state, &caller, &id, edits).await?;
    Ok(Json(DataResponse { data: action }))
}

/// DELETE /api/v1/deposit-actions/{id}
///
/// Also deletes every deposit recorded against the action.
pub async fn delete_deposit_action(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = deposit_action::delete_deposit_action(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: deleted }))
}

/// GET /api/v1/deposit-actions/{id}/deposits
pub async fn list_deposits(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deposits = deposit::get_deposits_by_deposit_action_id(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: deposits }))
}
