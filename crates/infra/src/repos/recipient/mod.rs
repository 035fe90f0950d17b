mod inmemory;
mod sqlite;

pub use inmemory::InMemoryRecipientRepo;
pub use sqlite::SqliteRecipientRepo;
use notifier_domain::{Recipient, ID};

#[async_trait::async_trait]
pub trait IRecipientRepo: Send + Sync {
    async fn upsert(&self, recipient: &Recipient) -> anyhow::Result<()>;
    async fn find(&self, recipient_id: &ID) -> anyhow::Result<Option<Recipient>>;
    async fn find_all(&self) -> anyhow::Result<Vec<Recipient>>;
    async fn delete(&self, recipient_id: &ID) -> anyhow::Result<Option<Recipient>>;
}
