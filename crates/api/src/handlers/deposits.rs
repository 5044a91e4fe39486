//! Handlers for the `/deposits` resource.

use action_bank_core::bank::DepositEdits;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::OwnerQuery;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::resolvers::deposit::{self, AddDepositInput};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/deposits?userId=
pub async fn list_deposits(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<impl IntoResponse> {
    let deposits = deposit::get_deposits_by_user_id(&state, &caller, query.owner(&caller)).await?;
    Ok(Json(DataResponse { data: deposits }))
}

/// GET /api/v1/deposits/{id}
pub async fn get_deposit(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deposit = deposit::get_deposit_by_id(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: deposit }))
}

/// POST /api/v1/deposits
///
/// Records a deposit at the action's current rate.
pub async fn create_deposit(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<AddDepositInput>,
) -> AppResult<impl IntoResponse> {
    let deposit = deposit::add_deposit(&state, &caller, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: deposit })))
}

/// PATCH /api/v1/deposits/{id}
pub async fn edit_deposit(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(edits): Json<DepositEdits>,
) -> AppResult<impl IntoResponse> {
    let deposit = deposit::edit_deposit(&state, &caller, &id, edits).await?;
    Ok(Json(DataResponse { data: deposit }))
}

/// DELETE /api/v1/deposits/{id}
pub async fn delete_deposit(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = deposit::delete_deposit(&state, &caller, &id).await?;
    Ok(Json(DataResponse { data: deleted }))
}
