//! JWT-based authentication extractor for Axum handlers.

use action_bank_core::error::CoreError;
use action_bank_core::types::EntityId;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// The message every authentication failure carries. Callers are never told
/// whether the header was missing, malformed, or expired.
pub const UNAUTHENTICATED: &str = "Authentication required";

/// Caller identity extracted from a JWT Bearer token in the `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, user_type = %user.user_type, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: EntityId,
    pub username: String,
    /// The caller's role name (e.g. `"admin"`).
    pub user_type: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            user_type: claims.user_type,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthenticated = || AppError::Core(CoreError::Unauthorized(UNAUTHENTICATED.into()));

        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(unauthenticated)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            unauthenticated()
        })?;

        Ok(claims.into())
    }
}
