//! Ranked user roles and the registry they are resolved from.
//!
//! A [`UserType`] is compared purely by its `level`; the name is only used for
//! lookup and for embedding in tokens and persisted user records. The
//! [`UserTypeMap`] is built once at process start and shared (behind an `Arc`)
//! with every component that needs role lookups.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;

pub const USER_TYPE_SUPER_ADMIN: &str = "superAdmin";
pub const USER_TYPE_ADMIN: &str = "admin";
pub const USER_TYPE_EDITOR: &str = "editor";
pub const USER_TYPE_BASIC: &str = "basic";

/// A named rank. Higher `level` means more privilege.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserType {
    name: String,
    level: u32,
}

impl UserType {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// True when this rank is at least as high as `min`.
    pub fn can_access_level(&self, min: &UserType) -> bool {
        self.level >= min.level
    }
}

/// Registry of every known [`UserType`], keyed by name.
#[derive(Debug, Clone)]
pub struct UserTypeMap {
    types: HashMap<String, UserType>,
}

impl UserTypeMap {
    pub fn new(types: impl IntoIterator<Item = UserType>) -> Self {
        let types = types
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();
        Self { types }
    }

    /// Look up a user type by name.
    ///
    /// Unknown names are an error naming the valid ones; there is no fallback
    /// rank.
    pub fn get(&self, name: &str) -> Result<&UserType, CoreError> {
        self.types.get(name).ok_or_else(|| {
            CoreError::Validation(format!(
                "Unknown user type '{name}'. Expected one of: {}",
                self.names().join(", ")
            ))
        })
    }

    /// Compare two ranks. `Less` means `a` is ranked below `b`.
    pub fn compare_levels(&self, a: &UserType, b: &UserType) -> Ordering {
        a.level.cmp(&b.level)
    }

    /// Names of all registered user types, lowest rank first.
    pub fn names(&self) -> Vec<&str> {
        let mut types: Vec<&UserType> = self.types.values().collect();
        types.sort_by_key(|t| t.level);
        types.into_iter().map(|t| t.name.as_str()).collect()
    }
}

impl Default for UserTypeMap {
    /// `superAdmin` > `admin` > `editor` > `basic`.
    fn default() -> Self {
        Self::new([
            UserType::new(USER_TYPE_SUPER_ADMIN, 1000),
            UserType::new(USER_TYPE_ADMIN, 100),
            UserType::new(USER_TYPE_EDITOR, 10),
            UserType::new(USER_TYPE_BASIC, 1),
        ])
    }
}
