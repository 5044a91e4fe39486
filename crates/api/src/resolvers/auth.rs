//! Login.

use action_bank_core::error::CoreError;
use action_bank_core::user::{UserResponse, ENTITY_USER};
use action_bank_db::RepoError;
use serde::{Deserialize, Serialize};

use super::repo_error;
use crate::auth::jwt::generate_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// A signed token and the user it was issued to.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Authenticate with username and password.
///
/// Unknown users, disabled users and wrong passwords all fail with the same
/// "Invalid Credentials".
pub async fn login(state: &AppState, input: LoginInput) -> AppResult<LoginResponse> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid Credentials".into()));

    let user = state
        .users
        .get_user_by_username(&input.username)
        .await
        .map_err(|e| match e {
            RepoError::DoesNotExist { .. } => invalid(),
            other => repo_error(ENTITY_USER)(other),
        })?;

    if !user.fields.enabled {
        tracing::info!(user_id = %user.id, "Login attempt for disabled user");
        return Err(invalid());
    }

    let verified = verify_password(&input.password, &user.fields.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    let token = generate_token(
        &user.id,
        &user.fields.username,
        user.user_type().name(),
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation: {e}")))?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(LoginResponse {
        token,
        user: UserResponse::from(&user),
    })
}
