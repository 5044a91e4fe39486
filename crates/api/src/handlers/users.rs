//! Handlers for the `/users` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireSelfOrAdmin};
use crate::resolvers::user::{
    self, AddUserInput, UpdatePasswordInput, UpdatePasswordWithTokenInput,
};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for `GET /users`.
const DEFAULT_PAGE_SIZE: usize = 10;

/// Query parameters for `GET /users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    pub page_size: Option<usize>,
    pub page: Option<usize>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// GET /api/v1/users?pageSize=&page=
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<impl IntoResponse> {
    let users = user::get_users(
        &state,
        params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        params.page.unwrap_or(1),
    )
    .await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user = user::get_user_by_id(&state, &id).await?;
    Ok(Json(DataResponse { data: user }))
}

/// GET /api/v1/users/by-username/{username}
pub async fn get_user_by_username(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user = user::get_user_by_username(&state, &username).await?;
    Ok(Json(DataResponse { data: user }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/users
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<AddUserInput>,
) -> AppResult<impl IntoResponse> {
    let user = user::add_user(&state, &admin, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// PATCH /api/v1/users/{id}
///
/// Self-service profile edit.
pub async fn edit_user(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let user = user::edit_user(&state, &caller, &id, &payload).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/users/{id}
///
/// Admin edit. May change role and password.
pub async fn admin_edit_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let user = user::admin_edit_user(&state, &admin, &id, &payload).await?;
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = user::delete_user(&state, &admin, &id).await?;
    Ok(Json(DataResponse { data: deleted }))
}

/// POST /api/v1/users/{id}/password
pub async fn update_password(
    RequireSelfOrAdmin(caller): RequireSelfOrAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePasswordInput>,
) -> AppResult<impl IntoResponse> {
    let updated = user::update_password(&state, &caller, &id, input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/users/{id}/reset-token
pub async fn create_reset_token(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let token = user::get_password_reset_token(&state, &admin, &id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: token })))
}

/// POST /api/v1/users/{id}/password-reset
///
/// Public: the reset token is the credential.
pub async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePasswordWithTokenInput>,
) -> AppResult<impl IntoResponse> {
    let updated = user::update_password_with_token(&state, &id, input).await?;
    Ok(Json(DataResponse { data: updated }))
}
