//! `users.json` backend.

use std::path::Path;
use std::sync::Arc;

use action_bank_core::roles::UserTypeMap;
use action_bank_core::types::{new_id, now};
use action_bank_core::user::{NewUser, User, ENTITY_USER};
use async_trait::async_trait;

use super::collection::Collection;
use crate::error::RepoError;
use crate::repositories::UserRepo;

pub const USERS_FILE: &str = "users.json";

pub struct FileUserRepo {
    users: Collection<User>,
}

impl FileUserRepo {
    pub async fn open(dir: &Path, user_types: Arc<UserTypeMap>) -> Result<Self, RepoError> {
        let users = Collection::load(dir, USERS_FILE, ENTITY_USER, move |value| {
            User::from_json(value, &user_types)
        })
        .await?;
        Ok(Self { users })
    }
}

/// Which unique field another user already holds, if any. The user with
/// `id` (the one being edited) is ignored. Username is checked before email.
fn conflict<'a>(
    users: impl Iterator<Item = &'a User>,
    id: Option<&str>,
    username: &str,
    email: &str,
) -> Option<RepoError> {
    let others: Vec<&User> = users.filter(|u| Some(u.id.as_str()) != id).collect();
    if others.iter().any(|u| u.fields.username == username) {
        return Some(RepoError::UsernameExists);
    }
    if others.iter().any(|u| u.fields.email == email) {
        return Some(RepoError::EmailExists);
    }
    None
}

#[async_trait]
impl UserRepo for FileUserRepo {
    async fn get_user_by_id(&self, id: &str) -> Result<User, RepoError> {
        self.users.get(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, RepoError> {
        self.users
            .find(|u| u.fields.username == username)
            .await
            .ok_or(RepoError::does_not_exist(ENTITY_USER))
    }

    async fn get_users(&self, page_size: usize, page: usize) -> Result<Vec<User>, RepoError> {
        let mut users = self.users.all().await;
        users.sort_by(|a, b| a.date_added.cmp(&b.date_added).then_with(|| a.id.cmp(&b.id)));

        let skip = page.saturating_sub(1).saturating_mul(page_size);
        Ok(users.into_iter().skip(skip).take(page_size).collect())
    }

    async fn add_user(&self, user: NewUser) -> Result<User, RepoError> {
        self.users
            .update(|records| {
                if let Some(err) =
                    conflict(records.values(), None, &user.username, &user.email)
                {
                    return Err(err);
                }

                let mut id = new_id();
                while records.contains_key(&id) {
                    id = new_id();
                }

                let created = User::from_new(user, id, now());
                records.insert(created.id.clone(), created.clone());
                Ok(created)
            })
            .await
    }

    async fn edit_user(&self, user: User) -> Result<User, RepoError> {
        self.users
            .update(|records| {
                if !records.contains_key(&user.id) {
                    return Err(RepoError::does_not_exist(ENTITY_USER));
                }
                if let Some(err) = conflict(
                    records.values(),
                    Some(&user.id),
                    &user.fields.username,
                    &user.fields.email,
                ) {
                    return Err(err);
                }

                records.insert(user.id.clone(), user.clone());
                Ok(user)
            })
            .await
    }

    async fn update_password(&self, id: &str, password_hash: String) -> Result<(), RepoError> {
        self.users
            .update(|records| {
                let user = records
                    .get_mut(id)
                    .ok_or(RepoError::does_not_exist(ENTITY_USER))?;
                user.fields.password_hash = password_hash;
                user.password_reset_token = None;
                user.password_reset_date = None;
                user.date_updated = now();
                Ok(())
            })
            .await
    }

    async fn make_password_reset_token(
        &self,
        id: &str,
        token_hash: String,
    ) -> Result<(), RepoError> {
        self.users
            .update(|records| {
                let user = records
                    .get_mut(id)
                    .ok_or(RepoError::does_not_exist(ENTITY_USER))?;
                user.password_reset_token = Some(token_hash);
                user.password_reset_date = Some(now());
                Ok(())
            })
            .await
    }

    async fn delete_user(&self, id: &str) -> Result<(), RepoError> {
        self.users.remove(id).await.map(|_| ())
    }

    async fn is_no_users(&self) -> Result<bool, RepoError> {
        Ok(self.users.is_empty().await)
    }
}
