use crate::dtos::{ReminderDTO, ReminderOccurrenceDTO, ReminderWithNextOccurrenceDTO};
use chrono::{DateTime, Utc};
use notifier_domain::{Reminder, ReminderKind, WarningType, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderOccurrencesResponse {
    pub reminders: Vec<ReminderOccurrenceDTO>,
}

pub mod create_reminder {
    use super::*;

    #[derive(Serialize, Deserialize, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub kind: ReminderKind,
        #[serde(default)]
        pub param: i64,
        pub warning_at: Vec<WarningType>,
        pub spec: DateTime<Utc>,
        pub description: String,
        pub recipients: Vec<ID>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod update_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type RequestBody = super::create_reminder::RequestBody;

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderWithNextOccurrenceDTO>,
    }
}

pub mod get_reminders_overview {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        /// Zero or missing means no limit
        pub max_entries: Option<usize>,
    }

    pub type APIResponse = ReminderOccurrencesResponse;
}

pub mod get_reminders_by_month {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub year: i32,
        pub month: u32,
        /// Also list occurrences of the current month which already passed
        pub all: Option<bool>,
    }

    pub type APIResponse = ReminderOccurrencesResponse;
}
