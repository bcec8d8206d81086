// User service - Use cases over the user repository
use crate::application::user_repository::{UserPage, UserRepository};
use crate::domain::filter::UserFilter;
use crate::domain::user::{User, UserChanges};
use std::sync::Arc;

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_users(&self, filter: &UserFilter) -> anyhow::Result<UserPage> {
        self.repository.list(filter).await
    }

    pub async fn get_user(&self, id: &str) -> anyhow::Result<Option<User>> {
        self.repository.find_by_id(id).await
    }

    /// Apply a normalized partial update. An update with nothing to change
    /// reads the current row instead of issuing an empty write.
    pub async fn update_user(
        &self,
        id: &str,
        changes: &UserChanges,
    ) -> anyhow::Result<Option<User>> {
        if changes.is_empty() {
            return self.repository.find_by_id(id).await;
        }
        self.repository.update(id, changes).await
    }

    pub async fn ban_user(&self, id: &str) -> anyhow::Result<Option<User>> {
        self.repository.update(id, &UserChanges::ban(true)).await
    }

    pub async fn unban_user(&self, id: &str) -> anyhow::Result<Option<User>> {
        self.repository.update(id, &UserChanges::ban(false)).await
    }

    pub async fn set_vip(&self, id: &str, vip: bool) -> anyhow::Result<Option<User>> {
        self.repository.update(id, &UserChanges::vip(vip)).await
    }
}
