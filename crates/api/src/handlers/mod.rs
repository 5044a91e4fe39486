//! Thin axum wrappers around [`crate::resolvers`].
//!
//! Handlers pick arguments out of the request, run the guard extractor, call
//! one resolver and wrap the result in a [`DataResponse`](crate::response::DataResponse).

pub mod auth;
pub mod deposit_actions;
pub mod deposits;
pub mod exchanges;
pub mod users;
pub mod withdrawal_actions;
pub mod withdrawals;

use serde::Deserialize;

use crate::middleware::auth::AuthUser;

/// `?userId=` filter on the owner listings. Defaults to the caller.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    pub user_id: Option<String>,
}

impl OwnerQuery {
    pub fn owner<'a>(&'a self, caller: &'a AuthUser) -> &'a str {
        self.user_id.as_deref().unwrap_or(&caller.user_id)
    }
}
