//! User entity, its persisted shape, and field-level edits.
//!
//! A [`User`] holds a resolved [`UserType`], so it cannot be deserialized on
//! its own: [`User::from_json`] takes the [`UserTypeMap`] the role name is
//! looked up in. The persisted shape stores the role by name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::roles::{UserType, UserTypeMap};
use crate::types::{EntityId, Timestamp};

pub const ENTITY_USER: &str = "User";

/// The fields of a user before it is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    /// Argon2 PHC string. Never the plaintext password.
    pub password_hash: String,
    pub user_meta: Map<String, Value>,
    pub enabled: bool,
}

/// A persisted user.
///
/// Contains the password hash and reset token -- NEVER serialize this to API
/// responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: EntityId,
    pub fields: NewUser,
    /// SHA-256 hex digest of the outstanding reset token, if one was issued.
    pub password_reset_token: Option<String>,
    pub password_reset_date: Option<Timestamp>,
    pub date_added: Timestamp,
    pub date_updated: Timestamp,
}

/// On-disk shape of a user record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: EntityId,
    username: String,
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    user_type: String,
    password_hash: String,
    user_meta: Map<String, Value>,
    enabled: bool,
    #[serde(default)]
    password_reset_token: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    password_reset_date: Option<Timestamp>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    date_added: Timestamp,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    date_updated: Timestamp,
}

impl User {
    pub fn from_new(fields: NewUser, id: EntityId, now: Timestamp) -> Self {
        Self {
            id,
            fields,
            password_reset_token: None,
            password_reset_date: None,
            date_added: now,
            date_updated: now,
        }
    }

    /// Strictly parse a stored user record, resolving its role by name.
    pub fn from_json(value: Value, user_types: &UserTypeMap) -> Result<Self, CoreError> {
        let record: UserRecord = serde_json::from_value(value)
            .map_err(|e| CoreError::InvalidData(format!("{ENTITY_USER}: {e}")))?;
        let user_type = user_types
            .get(&record.user_type)
            .map_err(|e| CoreError::InvalidData(format!("{ENTITY_USER}: {e}")))?
            .clone();

        Ok(Self {
            id: record.id,
            fields: NewUser {
                username: record.username,
                email: record.email,
                first_name: record.first_name,
                last_name: record.last_name,
                user_type,
                password_hash: record.password_hash,
                user_meta: record.user_meta,
                enabled: record.enabled,
            },
            password_reset_token: record.password_reset_token,
            password_reset_date: record.password_reset_date,
            date_added: record.date_added,
            date_updated: record.date_updated,
        })
    }

    pub fn to_json(&self) -> Result<Value, CoreError> {
        let record = UserRecord {
            id: self.id.clone(),
            username: self.fields.username.clone(),
            email: self.fields.email.clone(),
            first_name: self.fields.first_name.clone(),
            last_name: self.fields.last_name.clone(),
            user_type: self.fields.user_type.name().to_string(),
            password_hash: self.fields.password_hash.clone(),
            user_meta: self.fields.user_meta.clone(),
            enabled: self.fields.enabled,
            password_reset_token: self.password_reset_token.clone(),
            password_reset_date: self.password_reset_date,
            date_added: self.date_added,
            date_updated: self.date_updated,
        };
        serde_json::to_value(record)
            .map_err(|e| CoreError::InvalidData(format!("{ENTITY_USER}: {e}")))
    }

    pub fn user_type(&self) -> &UserType {
        &self.fields.user_type
    }

    /// Build the edited user.
    ///
    /// Only whitelisted fields can change. A field that is absent, or whose
    /// override is unusable (an empty username, an unknown role name), keeps
    /// its current value.
    pub fn merge_edits(&self, edits: &UserEdits, user_types: &UserTypeMap, now: Timestamp) -> Self {
        let current = &self.fields;
        let user_type = edits
            .user_type
            .as_deref()
            .and_then(|name| user_types.get(name).ok())
            .cloned()
            .unwrap_or_else(|| current.user_type.clone());

        Self {
            id: self.id.clone(),
            fields: NewUser {
                username: non_empty(&edits.username).unwrap_or_else(|| current.username.clone()),
                email: non_empty(&edits.email).unwrap_or_else(|| current.email.clone()),
                first_name: edits
                    .first_name
                    .clone()
                    .unwrap_or_else(|| current.first_name.clone()),
                last_name: edits
                    .last_name
                    .clone()
                    .unwrap_or_else(|| current.last_name.clone()),
                user_type,
                password_hash: non_empty(&edits.password_hash)
                    .unwrap_or_else(|| current.password_hash.clone()),
                user_meta: edits
                    .user_meta
                    .clone()
                    .unwrap_or_else(|| current.user_meta.clone()),
                enabled: edits.enabled.unwrap_or(current.enabled),
            },
            password_reset_token: self.password_reset_token.clone(),
            password_reset_date: self.password_reset_date,
            date_added: self.date_added,
            date_updated: now,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// Whitelisted overrides for a user.
///
/// `password_hash` is never read from caller input; only the admin edit path
/// sets it, after hashing a supplied password.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserEdits {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_type: Option<String>,
    pub user_meta: Option<Map<String, Value>>,
    pub enabled: Option<bool>,
    pub password_hash: Option<String>,
}

impl UserEdits {
    /// Pick the whitelisted fields out of a loosely-typed payload.
    ///
    /// Fields of the wrong type are ignored rather than rejected.
    pub fn from_json(value: &Value) -> Self {
        let string = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_owned);

        Self {
            username: string("username"),
            email: string("email"),
            first_name: string("firstName"),
            last_name: string("lastName"),
            user_type: string("userType"),
            user_meta: value.get("userMeta").and_then(Value::as_object).cloned(),
            enabled: value.get("enabled").and_then(Value::as_bool),
            password_hash: None,
        }
    }

    pub fn with_password_hash(mut self, hash: String) -> Self {
        self.password_hash = Some(hash);
        self
    }
}

/// Safe user representation for API responses (no password hash, no token).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Role name (e.g. `"admin"`).
    pub user_type: String,
    pub user_meta: Map<String, Value>,
    pub enabled: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_added: Timestamp,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_updated: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.fields.username.clone(),
            email: user.fields.email.clone(),
            first_name: user.fields.first_name.clone(),
            last_name: user.fields.last_name.clone(),
            user_type: user.fields.user_type.name().to_string(),
            user_meta: user.fields.user_meta.clone(),
            enabled: user.fields.enabled,
            date_added: user.date_added,
            date_updated: user.date_updated,
        }
    }
}
