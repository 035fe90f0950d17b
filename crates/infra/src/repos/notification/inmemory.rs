use super::INotificationRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::{DateTime, Utc};
use notifier_domain::{Entity, Notification, ID};

pub struct InMemoryNotificationRepo {
    notifications: std::sync::Mutex<Vec<Notification>>,
}

impl InMemoryNotificationRepo {
    pub fn new() -> Self {
        Self {
            notifications: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl INotificationRepo for InMemoryNotificationRepo {
    async fn upsert(&self, notification: &Notification) -> anyhow::Result<()> {
        upsert(notification, &self.notifications);
        Ok(())
    }

    async fn find(&self, notification_id: &ID) -> anyhow::Result<Option<Notification>> {
        Ok(find(notification_id, &self.notifications))
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Notification>> {
        Ok(find_by(&self.notifications, |_| true))
    }

    async fn find_expired(&self, as_of: DateTime<Utc>) -> anyhow::Result<Vec<ID>> {
        let expired = find_by(&self.notifications, |n| n.is_due(as_of));
        Ok(expired.iter().map(|n| n.id()).collect())
    }

    async fn count_siblings(&self, parent_id: &ID) -> anyhow::Result<usize> {
        Ok(count_by(&self.notifications, |n| n.parent == *parent_id))
    }

    async fn delete(&self, notification_id: &ID) -> anyhow::Result<Option<Notification>> {
        Ok(delete(notification_id, &self.notifications))
    }

    async fn delete_by_parent(&self, parent_id: &ID) -> anyhow::Result<Vec<Notification>> {
        Ok(find_and_delete_by(&self.notifications, |n| {
            n.parent == *parent_id
        }))
    }
}
