//! Handlers for the `/withdrawals` resource.

use action_bank_core::bank::WithdrawalEdits;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::OwnerQuery;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::resolvers::withdrawal::{self, AddWithdrawalInput};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/withdrawals?userId=
pub async fn list_withdrawals(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<impl IntoResponse> {
    let withdrawals =
        withdrawal::get_withdrawals_by_user_id(&state, &caller, query.owner(&caller)).await?;
    Ok(Json(DataResponse { data: withdrawals }))
}

/// GET /api/v1/withdrawals/{id}
pub async fn get_withdrawal(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let withdrawal = withdrawal::get_withdrawal_by_id(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: withdrawal }))
}

/// POST /api/v1/withdrawals
pub async fn create_withdrawal(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<AddWithdrawalInput>,
) -> AppResult<impl IntoResponse> {
    let withdrawal = withdrawal::add_withdrawal(&state, &caller, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: withdrawal })))
}

/// PATCH /api/v1/withdrawals/{id}
pub async fn edit_withdrawal(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(edits): Json<WithdrawalEdits>,
) -> AppResult<impl IntoResponse> {
    let withdrawal = withdrawal::edit_withdrawal(&state, &caller, &id, edits).await?;
    Ok(Json(DataResponse { data: withdrawal }))
}

/// DELETE /api/v1/withdrawals/{id}
pub async fn delete_withdrawal(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = withdrawal::delete_withdrawal(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: deleted }))
}
