use chrono::{DateTime, Utc};
use notifier_domain::{Reminder, ReminderKind, WarningType, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub kind: ReminderKind,
    pub param: i64,
    pub warning_at: Vec<WarningType>,
    pub spec: DateTime<Utc>,
    pub description: String,
    pub recipients: Vec<ID>,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            kind: reminder.kind,
            param: reminder.param,
            warning_at: reminder.warning_at,
            spec: reminder.spec,
            description: reminder.description,
            recipients: reminder.recipients,
        }
    }
}

/// The parts of a `Reminder` shown in overviews
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSummaryDTO {
    pub id: ID,
    pub description: String,
    pub kind: ReminderKind,
}

impl ReminderSummaryDTO {
    pub fn new(reminder: &Reminder) -> Self {
        Self {
            id: reminder.id,
            description: reminder.description.clone(),
            kind: reminder.kind,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderWithNextOccurrenceDTO {
    pub reminder: ReminderDTO,
    pub next_occurrence: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderOccurrenceDTO {
    pub reminder: ReminderSummaryDTO,
    pub next_occurrence: DateTime<Utc>,
}
