use crate::dtos::NotificationDTO;
use chrono::{DateTime, Utc};
use notifier_domain::{Notification, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub notification: NotificationDTO,
}

impl NotificationResponse {
    pub fn new(notification: Notification) -> Self {
        Self {
            notification: NotificationDTO::new(notification),
        }
    }
}

pub mod create_notification {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub recipient: ID,
        pub warning_time: DateTime<Utc>,
        pub description: String,
    }

    pub type APIResponse = NotificationResponse;
}

pub mod get_notifications {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub notifications: Vec<NotificationDTO>,
    }
}

pub mod get_notification_expiry {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub notification_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub notification_id: ID,
        pub warning_time: DateTime<Utc>,
    }
}

pub mod delete_notification {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub notification_id: ID,
    }

    pub type APIResponse = NotificationResponse;
}
