mod inmemory;
mod sqlite;

use chrono::{DateTime, Utc};
pub use inmemory::InMemoryNotificationRepo;
pub use sqlite::SqliteNotificationRepo;
use notifier_domain::{Notification, ID};

#[async_trait::async_trait]
pub trait INotificationRepo: Send + Sync {
    async fn upsert(&self, notification: &Notification) -> anyhow::Result<()>;
    async fn find(&self, notification_id: &ID) -> anyhow::Result<Option<Notification>>;
    async fn find_all(&self) -> anyhow::Result<Vec<Notification>>;
    /// Ids of all notifications with a warning time at or before `as_of`
    async fn find_expired(&self, as_of: DateTime<Utc>) -> anyhow::Result<Vec<ID>>;
    /// Number of notifications owned by `parent_id`
    async fn count_siblings(&self, parent_id: &ID) -> anyhow::Result<usize>;
    async fn delete(&self, notification_id: &ID) -> anyhow::Result<Option<Notification>>;
    async fn delete_by_parent(&self, parent_id: &ID) -> anyhow::Result<Vec<Notification>>;
}
