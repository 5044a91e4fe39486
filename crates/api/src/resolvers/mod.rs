//! Transport-agnostic operations.
//!
//! Every resolver takes the shared [`AppState`](crate::state::AppState), the
//! authenticated caller and a typed argument structure, and returns either a
//! value or an [`AppError`]. Storage failures never leave this module raw:
//! [`repo_error`] maps each one onto a caller-safe error.
//!
//! Ownership is enforced here, not in the guards. A record that exists but
//! belongs to someone else is reported exactly like a missing one.

pub mod auth;
pub mod deposit;
pub mod deposit_action;
pub mod exchange;
pub mod user;
pub mod withdrawal;
pub mod withdrawal_action;

use action_bank_core::error::CoreError;
use action_bank_db::RepoError;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

/// Build a `map_err` adapter translating storage failures for `entity`.
pub(crate) fn repo_error(entity: &'static str) -> impl FnOnce(RepoError) -> AppError {
    move |err| match err {
        RepoError::DoesNotExist { .. } => CoreError::not_found(entity).into(),
        RepoError::UsernameExists => CoreError::Conflict("Username already exists".into()).into(),
        RepoError::EmailExists => CoreError::Conflict("Email already exists".into()).into(),
        other => {
            tracing::error!(error = %other, entity, "Storage operation failed");
            CoreError::Internal("Error performing operation".into()).into()
        }
    }
}

/// The "not found" error used both for missing records and for records the
/// caller does not own.
pub(crate) fn not_found(entity: &'static str) -> AppError {
    CoreError::not_found(entity).into()
}

/// Report a broken or foreign parent link as the child itself being missing.
pub(crate) fn as_missing(err: AppError, entity: &'static str) -> AppError {
    match err {
        AppError::Core(CoreError::NotFound { .. }) => not_found(entity),
        other => other,
    }
}

/// Listing by owner is only ever allowed for the caller's own id.
pub(crate) fn ensure_own_user_id(caller: &AuthUser, user_id: &str) -> Result<(), AppError> {
    if caller.user_id != user_id {
        return Err(CoreError::Forbidden("Forbidden".into()).into());
    }
    Ok(())
}
