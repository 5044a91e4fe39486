//! Guard extractors.
//!
//! Each extractor authenticates the caller with [`AuthUser`] and then
//! evaluates a [`Guard`]. A missing or invalid token is a 401; a valid token
//! that the guard denies is a generic 403.

use action_bank_core::error::CoreError;
use action_bank_core::roles::USER_TYPE_ADMIN;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::auth::AuthUser;
use super::guards::Guard;
use crate::error::AppError;
use crate::state::AppState;

fn check(guard: Guard<'_>, user: &AuthUser, state: &AppState) -> Result<(), AppError> {
    if guard.allows(Some(user), &state.user_types) {
        Ok(())
    } else {
        tracing::debug!(user_id = %user.user_id, ?guard, "Guard denied request");
        Err(AppError::Core(CoreError::Forbidden("Forbidden".into())))
    }
}

/// Requires any authenticated user.
///
/// Functionally equivalent to [`AuthUser`] but named explicitly so a route's
/// guard is visible in the handler signature.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        check(Guard::LoggedIn, &user, state)?;
        Ok(RequireAuth(user))
    }
}

/// Requires the `admin` rank or higher.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        check(Guard::MinUserType(USER_TYPE_ADMIN), &user, state)?;
        Ok(RequireAdmin(user))
    }
}

/// Requires the caller to be the user named by the `{id}` path segment, or to
/// hold the `admin` rank.
///
/// Only usable on routes whose single path parameter is a user id.
pub struct RequireSelfOrAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSelfOrAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let Path(owner_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        check(
            Guard::SelfOr {
                owner_id: &owner_id,
                min_user_type: USER_TYPE_ADMIN,
            },
            &user,
            state,
        )?;
        Ok(RequireSelfOrAdmin(user))
    }
}
