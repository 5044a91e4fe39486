//! Authorization guards.
//!
//! A [`Guard`] is a pure predicate over the caller. It never errors: anything
//! it cannot evaluate (no caller, an unknown role name) is a denial. The
//! extractors in [`super::rbac`] turn a denial into a response before the
//! handler body runs.

use action_bank_core::roles::UserTypeMap;

use super::auth::AuthUser;

/// An allow/deny rule for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard<'a> {
    /// Any authenticated caller.
    LoggedIn,
    /// Callers whose role is at least `min_user_type`.
    MinUserType(&'a str),
    /// Callers whose id equals `owner_id`, or whose role is at least
    /// `min_user_type`.
    SelfOr {
        owner_id: &'a str,
        min_user_type: &'a str,
    },
}

impl Guard<'_> {
    pub fn allows(&self, caller: Option<&AuthUser>, user_types: &UserTypeMap) -> bool {
        let Some(caller) = caller else {
            return false;
        };

        match *self {
            Guard::LoggedIn => true,
            Guard::MinUserType(min) => has_rank(caller, min, user_types),
            Guard::SelfOr {
                owner_id,
                min_user_type,
            } => caller.user_id == owner_id || has_rank(caller, min_user_type, user_types),
        }
    }
}

fn has_rank(caller: &AuthUser, min: &str, user_types: &UserTypeMap) -> bool {
    match (user_types.get(&caller.user_type), user_types.get(min)) {
        (Ok(caller_type), Ok(min_type)) => caller_type.can_access_level(min_type),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use action_bank_core::roles::{
        USER_TYPE_ADMIN, USER_TYPE_BASIC, USER_TYPE_EDITOR, USER_TYPE_SUPER_ADMIN,
    };

    use super::*;

    fn caller(id: &str, user_type: &str) -> AuthUser {
        AuthUser {
            user_id: id.into(),
            username: format!("user-{id}"),
            user_type: user_type.into(),
        }
    }

    #[test]
    fn no_caller_is_always_denied() {
        let map = UserTypeMap::default();
        assert!(!Guard::LoggedIn.allows(None, &map));
        assert!(!Guard::MinUserType(USER_TYPE_BASIC).allows(None, &map));
        assert!(!Guard::SelfOr {
            owner_id: "u1",
            min_user_type: USER_TYPE_ADMIN
        }
        .allows(None, &map));
    }

    #[test]
    fn logged_in_allows_any_rank() {
        let map = UserTypeMap::default();
        assert!(Guard::LoggedIn.allows(Some(&caller("u1", USER_TYPE_BASIC)), &map));
    }

    #[test]
    fn role_floor_is_inclusive() {
        let map = UserTypeMap::default();
        let guard = Guard::MinUserType(USER_TYPE_ADMIN);

        assert!(guard.allows(Some(&caller("a", USER_TYPE_ADMIN)), &map));
        assert!(guard.allows(Some(&caller("s", USER_TYPE_SUPER_ADMIN)), &map));
        assert!(!guard.allows(Some(&caller("e", USER_TYPE_EDITOR)), &map));
    }

    #[test]
    fn self_or_role() {
        let map = UserTypeMap::default();
        let guard = Guard::SelfOr {
            owner_id: "u1",
            min_user_type: USER_TYPE_ADMIN,
        };

        assert!(guard.allows(Some(&caller("u1", USER_TYPE_BASIC)), &map));
        assert!(guard.allows(Some(&caller("u2", USER_TYPE_ADMIN)), &map));
        assert!(!guard.allows(Some(&caller("u2", USER_TYPE_EDITOR)), &map));
    }

    #[test]
    fn unknown_role_names_deny() {
        let map = UserTypeMap::default();
        assert!(!Guard::MinUserType(USER_TYPE_BASIC).allows(Some(&caller("u1", "root")), &map));
        let super_admin = caller("u1", USER_TYPE_SUPER_ADMIN);
        assert!(!Guard::MinUserType("root").allows(Some(&super_admin), &map));
    }
}
