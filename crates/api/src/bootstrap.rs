//! First-run seeding.

use action_bank_core::roles::USER_TYPE_SUPER_ADMIN;
use action_bank_core::user::{NewUser, ENTITY_USER};
use serde_json::Map;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::resolvers::repo_error;
use crate::state::AppState;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "password";

/// Seed a `superAdmin` with well-known credentials when the user store is
/// empty. Returns whether a user was created.
///
/// This exists so a fresh install can be logged into at all. It is not a
/// security feature: the password must be changed immediately.
pub async fn ensure_default_admin(state: &AppState) -> AppResult<bool> {
    let empty = state
        .users
        .is_no_users()
        .await
        .map_err(repo_error(ENTITY_USER))?;
    if !empty {
        return Ok(false);
    }

    let password_hash = hash_password(DEFAULT_ADMIN_PASSWORD)
        .map_err(|e| AppError::InternalError(format!("Password hashing: {e}")))?;
    let user_type = state.user_types.get(USER_TYPE_SUPER_ADMIN)?.clone();

    let user = state
        .users
        .add_user(NewUser {
            username: DEFAULT_ADMIN_USERNAME.into(),
            email: "admin@localhost".into(),
            first_name: String::new(),
            last_name: String::new(),
            user_type,
            password_hash,
            user_meta: Map::new(),
            enabled: true,
        })
        .await
        .map_err(repo_error(ENTITY_USER))?;

    tracing::warn!(
        user_id = %user.id,
        username = DEFAULT_ADMIN_USERNAME,
        "No users found; created default superAdmin with the default password. Change it now."
    );
    Ok(true)
}
