use std::sync::Arc;

use action_bank_core::roles::UserTypeMap;
use action_bank_db::{BankRepo, DataStore, UserRepo};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (every field is behind an `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// User storage.
    pub users: Arc<dyn UserRepo>,
    /// Exchange, action and transaction storage.
    pub bank: Arc<dyn BankRepo>,
    /// Role registry, built once at startup.
    pub user_types: Arc<UserTypeMap>,
    /// Server configuration (JWT secret, reset-token timeout, ...).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: DataStore, user_types: Arc<UserTypeMap>, config: ServerConfig) -> Self {
        Self {
            users: store.users,
            bank: store.bank,
            user_types,
            config: Arc::new(config),
        }
    }
}
