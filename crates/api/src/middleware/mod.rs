//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a JWT Bearer token.
//! - [`guards::Guard`] -- Pure allow/deny predicates over the caller.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` rank or higher.
//! - [`rbac::RequireSelfOrAdmin`] -- Requires the caller to own the `{id}` path
//!   segment, or to hold the `admin` rank.

pub mod auth;
pub mod guards;
pub mod rbac;
