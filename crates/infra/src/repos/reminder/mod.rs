mod inmemory;
mod sqlite;

pub use inmemory::InMemoryReminderRepo;
pub use sqlite::SqliteReminderRepo;
use notifier_domain::{Reminder, ID};

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn upsert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>>;
    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>>;
    async fn find_by_recipient(&self, recipient_id: &ID) -> anyhow::Result<Vec<Reminder>>;
    async fn delete(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>>;
}
