use super::IRecipientRepo;
use crate::repos::shared::inmemory_repo::*;
use notifier_domain::{Recipient, ID};

pub struct InMemoryRecipientRepo {
    recipients: std::sync::Mutex<Vec<Recipient>>,
}

impl InMemoryRecipientRepo {
    pub fn new() -> Self {
        Self {
            recipients: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IRecipientRepo for InMemoryRecipientRepo {
    async fn upsert(&self, recipient: &Recipient) -> anyhow::Result<()> {
        upsert(recipient, &self.recipients);
        Ok(())
    }

    async fn find(&self, recipient_id: &ID) -> anyhow::Result<Option<Recipient>> {
        Ok(find(recipient_id, &self.recipients))
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Recipient>> {
        Ok(find_by(&self.recipients, |_| true))
    }

    async fn delete(&self, recipient_id: &ID) -> anyhow::Result<Option<Recipient>> {
        Ok(delete(recipient_id, &self.recipients))
    }
}
