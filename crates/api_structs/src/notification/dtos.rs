use chrono::{DateTime, Utc};
use notifier_domain::{Notification, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDTO {
    pub id: ID,
    /// Missing for notifications that were created by hand
    pub parent: Option<ID>,
    pub warning_time: DateTime<Utc>,
    pub description: String,
    pub recipient: ID,
}

impl NotificationDTO {
    pub fn new(notification: Notification) -> Self {
        Self {
            id: notification.id,
            parent: if notification.has_parent() {
                Some(notification.parent)
            } else {
                None
            },
            warning_time: notification.warning_time,
            description: notification.description,
            recipient: notification.recipient,
        }
    }
}
