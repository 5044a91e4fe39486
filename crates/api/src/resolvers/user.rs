//! User management operations and the rank rules that govern them.
//!
//! Rank is compared by [`UserType::level`]. A requester may act on a user of
//! equal or lower rank and may hand out roles up to their own rank. Nobody
//! may delete themselves or change their own role.

use action_bank_core::error::CoreError;
use action_bank_core::roles::{UserType, USER_TYPE_BASIC};
use action_bank_core::types::{now, EntityId};
use action_bank_core::user::{NewUser, User, UserEdits, UserResponse, ENTITY_USER};
use action_bank_db::RepoError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidateEmail};

use super::repo_error;
use crate::auth::jwt::{generate_reset_token, reset_token_matches};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, UNAUTHENTICATED};
use crate::state::AppState;

const INVALID_RESET_TOKEN: &str = "Invalid password reset token";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

fn default_user_type() -> String {
    USER_TYPE_BASIC.to_string()
}

fn default_enabled() -> bool {
    true
}

/// Arguments for [`add_user`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddUserInput {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_user_type")]
    pub user_type: String,
    #[serde(default)]
    pub user_meta: Map<String, Value>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Arguments for [`update_password`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordInput {
    pub old_password: String,
    pub new_password: String,
}

/// Arguments for [`update_password_with_token`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordWithTokenInput {
    pub token: String,
    pub new_password: String,
}

/// A freshly issued password reset token. Shown once; only its digest is kept.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetTokenResponse {
    pub user_id: EntityId,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn fetch_user(state: &AppState, id: &str) -> AppResult<User> {
    state
        .users
        .get_user_by_id(id)
        .await
        .map_err(repo_error(ENTITY_USER))
}

/// The caller's current record. Rank is always taken from storage, not from
/// the token, so a demotion takes effect immediately.
async fn requester(state: &AppState, caller: &AuthUser) -> AppResult<User> {
    state
        .users
        .get_user_by_id(&caller.user_id)
        .await
        .map_err(|e| match e {
            RepoError::DoesNotExist { .. } => {
                CoreError::Unauthorized(UNAUTHENTICATED.into()).into()
            }
            other => repo_error(ENTITY_USER)(other),
        })
}

fn ensure_rank(requester: &User, required: &UserType, message: &str) -> AppResult<()> {
    if !requester.user_type().can_access_level(required) {
        return Err(CoreError::Conflict(message.into()).into());
    }
    Ok(())
}

fn check_password(password: &str) -> AppResult<()> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| CoreError::Validation(msg).into())
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::InternalError(format!("Password hashing: {e}")))
}

fn check_email(edits: &UserEdits) -> AppResult<()> {
    match &edits.email {
        Some(email) if !email.validate_email() => {
            Err(CoreError::Validation("Invalid email address".into()).into())
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// One page of users, oldest first. `page` is 1-based.
pub async fn get_users(
    state: &AppState,
    page_size: usize,
    page: usize,
) -> AppResult<Vec<UserResponse>> {
    if page_size == 0 || page == 0 {
        return Err(CoreError::Validation("pageSize and page must be 1 or greater".into()).into());
    }

    let users = state
        .users
        .get_users(page_size, page)
        .await
        .map_err(repo_error(ENTITY_USER))?;

    tracing::debug!(page_size, page, count = users.len(), "Listed users");
    Ok(users.iter().map(UserResponse::from).collect())
}

pub async fn get_user_by_id(state: &AppState, id: &str) -> AppResult<UserResponse> {
    Ok(UserResponse::from(&fetch_user(state, id).await?))
}

pub async fn get_user_by_username(state: &AppState, username: &str) -> AppResult<UserResponse> {
    let user = state
        .users
        .get_user_by_username(username)
        .await
        .map_err(repo_error(ENTITY_USER))?;
    Ok(UserResponse::from(&user))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Create a user. The requester cannot create a user that outranks them.
pub async fn add_user(
    state: &AppState,
    caller: &AuthUser,
    input: AddUserInput,
) -> AppResult<UserResponse> {
    input.validate()?;
    check_password(&input.password)?;

    let user_type = state.user_types.get(&input.user_type)?.clone();
    let requester = requester(state, caller).await?;
    ensure_rank(
        &requester,
        &user_type,
        "Cannot add a user with a higher user type than your own",
    )?;

    let user = state
        .users
        .add_user(NewUser {
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            user_type,
            password_hash: hash(&input.password)?,
            user_meta: input.user_meta,
            enabled: input.enabled,
        })
        .await
        .map_err(repo_error(ENTITY_USER))?;

    tracing::info!(
        user_id = %user.id,
        created_by = %caller.user_id,
        user_type = %user.user_type().name(),
        "User created"
    );
    Ok(UserResponse::from(&user))
}

/// Self-service edit. Only the caller's own record; the role and password
/// cannot change through here.
pub async fn edit_user(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
    payload: &Value,
) -> AppResult<UserResponse> {
    if caller.user_id != id {
        return Err(CoreError::Forbidden("Forbidden".into()).into());
    }

    let edits = UserEdits::from_json(payload);
    check_email(&edits)?;

    let existing = fetch_user(state, id).await?;
    if let Some(user_type) = &edits.user_type {
        if user_type != existing.user_type().name() {
            return Err(CoreError::Conflict("Cannot change your own user type".into()).into());
        }
    }

    let merged = existing.merge_edits(&edits, &state.user_types, now());
    let user = state
        .users
        .edit_user(merged)
        .await
        .map_err(repo_error(ENTITY_USER))?;

    tracing::info!(user_id = %user.id, "User updated own profile");
    Ok(UserResponse::from(&user))
}

/// Edit any user the requester outranks or ties, including their role and
/// password. The requester must also rank at least as high as any new role.
pub async fn admin_edit_user(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
    payload: &Value,
) -> AppResult<UserResponse> {
    let mut edits = UserEdits::from_json(payload);
    check_email(&edits)?;

    let requester = requester(state, caller).await?;
    let existing = fetch_user(state, id).await?;
    ensure_rank(
        &requester,
        existing.user_type(),
        "Cannot edit a user with a higher user type than your own",
    )?;

    if let Some(name) = &edits.user_type {
        let requested = state.user_types.get(name)?;
        ensure_rank(
            &requester,
            requested,
            "Cannot assign a user type higher than your own",
        )?;
        if id == caller.user_id && requested != existing.user_type() {
            return Err(CoreError::Conflict("Cannot change your own user type".into()).into());
        }
    }

    if let Some(password) = payload.get("password").and_then(Value::as_str) {
        check_password(password)?;
        edits = edits.with_password_hash(hash(password)?);
    }

    let merged = existing.merge_edits(&edits, &state.user_types, now());
    let user = state
        .users
        .edit_user(merged)
        .await
        .map_err(repo_error(ENTITY_USER))?;

    tracing::info!(user_id = %user.id, edited_by = %caller.user_id, "User updated by admin");
    Ok(UserResponse::from(&user))
}

/// Change a password after verifying the current one.
pub async fn update_password(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
    input: UpdatePasswordInput,
) -> AppResult<EntityId> {
    check_password(&input.new_password)?;

    let target = fetch_user(state, id).await?;
    let requester = requester(state, caller).await?;
    ensure_rank(
        &requester,
        target.user_type(),
        "Cannot update the password of a user with a higher user type than your own",
    )?;

    let verified = verify_password(&input.old_password, &target.fields.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification: {e}")))?;
    if !verified {
        return Err(CoreError::Validation("Invalid User Password".into()).into());
    }

    state
        .users
        .update_password(id, hash(&input.new_password)?)
        .await
        .map_err(repo_error(ENTITY_USER))?;

    tracing::info!(user_id = %id, changed_by = %caller.user_id, "Password updated");
    Ok(target.id)
}

pub async fn delete_user(state: &AppState, caller: &AuthUser, id: &str) -> AppResult<EntityId> {
    if caller.user_id == id {
        return Err(CoreError::Conflict("Cannot delete yourself".into()).into());
    }

    let target = fetch_user(state, id).await?;
    let requester = requester(state, caller).await?;
    ensure_rank(
        &requester,
        target.user_type(),
        "Cannot delete a user with a higher user type than your own",
    )?;

    state
        .users
        .delete_user(id)
        .await
        .map_err(repo_error(ENTITY_USER))?;

    tracing::info!(user_id = %id, deleted_by = %caller.user_id, "User deleted");
    Ok(target.id)
}

/// Issue a password reset token for a user the requester outranks or ties.
pub async fn get_password_reset_token(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<ResetTokenResponse> {
    let target = fetch_user(state, id).await?;
    let requester = requester(state, caller).await?;
    ensure_rank(
        &requester,
        target.user_type(),
        "Cannot reset the password of a user with a higher user type than your own",
    )?;

    let (token, token_hash) = generate_reset_token();
    state
        .users
        .make_password_reset_token(id, token_hash)
        .await
        .map_err(repo_error(ENTITY_USER))?;

    tracing::info!(user_id = %id, issued_by = %caller.user_id, "Password reset token issued");
    Ok(ResetTokenResponse {
        user_id: target.id,
        token,
    })
}

/// Set a new password using a reset token. Needs no login.
///
/// An unknown user, a wrong token and an expired token are indistinguishable
/// to the caller.
pub async fn update_password_with_token(
    state: &AppState,
    id: &str,
    input: UpdatePasswordWithTokenInput,
) -> AppResult<EntityId> {
    check_password(&input.new_password)?;

    let invalid = || AppError::Core(CoreError::Validation(INVALID_RESET_TOKEN.into()));

    let user = state.users.get_user_by_id(id).await.map_err(|e| match e {
        RepoError::DoesNotExist { .. } => invalid(),
        other => repo_error(ENTITY_USER)(other),
    })?;

    let (Some(stored), Some(issued)) = (&user.password_reset_token, user.password_reset_date)
    else {
        return Err(invalid());
    };
    if !reset_token_matches(&input.token, stored) {
        return Err(invalid());
    }
    let timeout = chrono::Duration::try_minutes(state.config.password_reset_timeout_mins)
        .ok_or_else(|| AppError::InternalError("Password reset timeout out of range".into()))?;
    if now() - issued > timeout {
        tracing::debug!(user_id = %id, "Expired password reset token");
        return Err(invalid());
    }

    state
        .users
        .update_password(id, hash(&input.new_password)?)
        .await
        .map_err(repo_error(ENTITY_USER))?;

    tracing::info!(user_id = %id, "Password reset with token");
    Ok(user.id)
}
