use crate::{
    error::DomainError,
    offset::WarningType,
    shared::entity::{Entity, ID},
};
use chrono::prelude::*;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Recurrence kind of a `Reminder`. Selects how the next occurrence of the
/// underlying event is computed, see `reference_time`.
///
/// Encoded on the wire as `1` Anniversary, `2` OneShot, `3` Monthly, `4` Weekly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ReminderKind {
    Anniversary,
    OneShot,
    Monthly,
    Weekly,
}

impl ReminderKind {
    /// Whether a drained reminder of this kind gets its next occurrence
    /// generated by the warner. One shot reminders are deleted instead.
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::OneShot)
    }
}

impl TryFrom<i64> for ReminderKind {
    type Error = DomainError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Anniversary),
            2 => Ok(Self::OneShot),
            3 => Ok(Self::Monthly),
            4 => Ok(Self::Weekly),
            _ => Err(DomainError::UnsupportedKind(code)),
        }
    }
}

impl From<ReminderKind> for i64 {
    fn from(kind: ReminderKind) -> Self {
        match kind {
            ReminderKind::Anniversary => 1,
            ReminderKind::OneShot => 2,
            ReminderKind::Monthly => 3,
            ReminderKind::Weekly => 4,
        }
    }
}

/// A `Reminder` is the template of a recurring (or one time) event. The
/// warner never fires a `Reminder` directly, it fires the `Notification`s
/// that are expanded from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    pub kind: ReminderKind,
    /// Hours before the event for `WarningType::SameDay`
    pub param: i64,
    pub warning_at: Vec<WarningType>,
    /// Anchor of the recurrence. Which components matter depends on `kind`
    pub spec: DateTime<Utc>,
    pub description: String,
    pub recipients: Vec<ID>,
}

impl Entity<ID> for Reminder {
    fn id(&self) -> ID {
        self.id
    }
}

impl Reminder {
    pub fn validate(&self) -> Result<(), DomainError> {
        // The nil id marks notifications without a parent
        if self.id.is_nil() {
            return Err(DomainError::InvalidReminder("id must not be the nil id"));
        }
        if self.description.is_empty() {
            return Err(DomainError::InvalidReminder("description must not be empty"));
        }
        if self.recipients.is_empty() {
            return Err(DomainError::InvalidReminder("recipients must not be empty"));
        }
        if self.warning_at.is_empty() {
            return Err(DomainError::InvalidReminder("warning types must not be empty"));
        }
        Ok(())
    }

    pub fn has_recipient(&self, recipient_id: &ID) -> bool {
        self.recipients.contains(recipient_id)
    }

    /// Removes every occurrence of `recipient_id`, returns whether it was present.
    pub fn remove_recipient(&mut self, recipient_id: &ID) -> bool {
        let before = self.recipients.len();
        self.recipients.retain(|r| r != recipient_id);
        before != self.recipients.len()
    }

    /// Hour and minute of the event in the client time zone, used when
    /// rendering notification texts.
    pub fn local_event_time(&self, tz: &Tz) -> (u32, u32) {
        let local = self.spec.with_timezone(tz);
        (local.hour(), local.minute())
    }
}

/// Removes duplicate warning types, keeping the first occurrence of each.
pub fn collapse_warning_types(warnings: Vec<WarningType>) -> Vec<WarningType> {
    let mut res: Vec<WarningType> = Vec::with_capacity(warnings.len());
    for w in warnings {
        if !res.contains(&w) {
            res.push(w);
        }
    }
    res
}

#[cfg(test)]
mod test {
    use super::*;

    fn reminder() -> Reminder {
        Reminder {
            id: ID::new(),
            kind: ReminderKind::Anniversary,
            param: 0,
            warning_at: vec![WarningType::SameDay],
            spec: Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap(),
            description: "Geburtstag".into(),
            recipients: vec![ID::new()],
        }
    }

    #[test]
    fn it_validates_reminders() {
        assert!(reminder().validate().is_ok());

        let mut r = reminder();
        r.description = "".into();
        assert!(r.validate().is_err());

        let mut r = reminder();
        r.recipients.clear();
        assert!(r.validate().is_err());

        let mut r = reminder();
        r.warning_at.clear();
        assert!(r.validate().is_err());

        let mut r = reminder();
        r.id = ID::nil();
        assert_eq!(
            r.validate(),
            Err(DomainError::InvalidReminder("id must not be the nil id"))
        );
    }

    #[test]
    fn it_removes_recipients() {
        let mut r = reminder();
        let other = ID::new();
        let first = r.recipients[0];
        r.recipients.push(other);

        assert!(r.remove_recipient(&first));
        assert!(!r.has_recipient(&first));
        assert_eq!(r.recipients, vec![other]);
        assert!(!r.remove_recipient(&first));
    }

    #[test]
    fn it_collapses_duplicate_warning_types() {
        let warnings = vec![
            WarningType::SameDay,
            WarningType::MorningBefore,
            WarningType::SameDay,
            WarningType::WeekBefore,
            WarningType::MorningBefore,
        ];
        assert_eq!(
            collapse_warning_types(warnings),
            vec![
                WarningType::SameDay,
                WarningType::MorningBefore,
                WarningType::WeekBefore
            ]
        );
    }

    #[test]
    fn only_one_shot_reminders_are_not_recurring() {
        assert!(!ReminderKind::OneShot.is_recurring());
        assert!(ReminderKind::Anniversary.is_recurring());
        assert!(ReminderKind::Monthly.is_recurring());
        assert!(ReminderKind::Weekly.is_recurring());
    }

    #[test]
    fn it_decodes_kind_codes() {
        assert_eq!(ReminderKind::try_from(1), Ok(ReminderKind::Anniversary));
        assert_eq!(ReminderKind::try_from(2), Ok(ReminderKind::OneShot));
        assert_eq!(ReminderKind::try_from(3), Ok(ReminderKind::Monthly));
        assert_eq!(ReminderKind::try_from(4), Ok(ReminderKind::Weekly));
        let err = ReminderKind::try_from(7).unwrap_err();
        assert_eq!(err.to_string(), "unsupported recurrence kind: 7");
    }
}
