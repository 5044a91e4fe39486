//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::resolvers::auth::{self, LoginInput};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns a token and the user.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<impl IntoResponse> {
    let response = auth::login(&state, input).await?;
    Ok(Json(DataResponse { data: response }))
}
