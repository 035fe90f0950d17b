use crate::shared::entity::{Entity, ID};
use chrono::prelude::*;

/// A single scheduled delivery of `description` to `recipient` at
/// `warning_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: ID,
    /// The `Reminder` that owns this `Notification`. `ID::nil()` for
    /// notifications that were created by hand.
    pub parent: ID,
    pub warning_time: DateTime<Utc>,
    pub description: String,
    pub recipient: ID,
}

impl Entity<ID> for Notification {
    fn id(&self) -> ID {
        self.id
    }
}

impl Notification {
    /// Creates a notification without a recurring parent
    pub fn ad_hoc(recipient: ID, warning_time: DateTime<Utc>, description: String) -> Self {
        Self {
            id: Default::default(),
            parent: ID::nil(),
            warning_time,
            description,
            recipient,
        }
    }

    pub fn has_parent(&self) -> bool {
        !self.parent.is_nil()
    }

    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        self.warning_time <= as_of
    }
}
