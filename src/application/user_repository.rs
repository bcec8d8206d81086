// Repository trait for user data access
use crate::domain::filter::UserFilter;
use crate::domain::user::{User, UserChanges};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One page of users plus the total number of matching rows.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub data: Vec<User>,
    pub count: u64,
}

/// The fixed counting queries behind the stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCount {
    Total,
    Active,
    Banned,
    Vip,
    CreatedSince(DateTime<Utc>),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch one page of users matching the filter, with the exact total.
    async fn list(&self, filter: &UserFilter) -> anyhow::Result<UserPage>;

    /// Fetch a single user; `None` when the row does not exist.
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>>;

    /// Apply a partial update; `None` when the row does not exist.
    async fn update(&self, id: &str, changes: &UserChanges) -> anyhow::Result<Option<User>>;

    /// Count rows matching one of the fixed stat conditions.
    async fn count(&self, kind: UserCount) -> anyhow::Result<u64>;

    /// Creation timestamps of users created at or after `since`.
    async fn created_since(&self, since: DateTime<Utc>) -> anyhow::Result<Vec<DateTime<Utc>>>;
}
