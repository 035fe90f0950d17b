use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use notifier_domain::{expand, DomainError, Notification, Reminder, ID};
use notifier_infra::{NotifierContext, ReminderSpaceRead, ReminderWriteGuard};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("reminder {0} still owns notifications")]
    ExistingNotifications(ID),
    #[error(transparent)]
    Expansion(#[from] DomainError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Rescheduled {
    /// Number of notifications generated for the next occurrence
    Expanded(usize),
    Deleted,
}

/// Keeps a reminder and the notifications expanded from it consistent.
///
/// Every operation runs under the reminder space write guard it is created
/// with, so readers never observe a reminder with a partial set of children.
pub struct Lifecycle<'g, 'a> {
    guard: &'g ReminderWriteGuard<'a>,
    now: DateTime<Utc>,
    tz: Tz,
}

impl<'g, 'a> Lifecycle<'g, 'a> {
    pub fn new(guard: &'g ReminderWriteGuard<'a>, ctx: &NotifierContext) -> Self {
        Self::at(guard, ctx.sys.now(), ctx.config.client_tz)
    }

    pub fn at(guard: &'g ReminderWriteGuard<'a>, now: DateTime<Utc>, tz: Tz) -> Self {
        Self { guard, now, tz }
    }

    /// Replaces the notifications of `reminder` with a fresh expansion.
    /// Succeeds even when every warning time already passed, the reminder
    /// is then stored without children.
    ///
    /// The expansion runs before anything is written, a reminder that cannot
    /// be expanded leaves the store untouched.
    pub async fn change_reminder(&self, reminder: &Reminder) -> Result<usize, LifecycleError> {
        let notifications = expand(reminder, self.now, &self.tz)?;
        let cleared = self.guard.clear_notifications(&reminder.id).await?;
        debug!(reminder_id = %reminder.id, cleared = cleared.len(), "Cleared notifications");
        self.guard.upsert_reminder(reminder).await?;
        self.persist(reminder, notifications).await
    }

    /// Generates the notifications for the next occurrence of a drained
    /// reminder. One shot reminders are deleted instead unless `forced`.
    pub async fn auto_reschedule(
        &self,
        reminder: &Reminder,
        forced: bool,
    ) -> Result<Rescheduled, LifecycleError> {
        if self.guard.count_siblings(&reminder.id).await? > 0 {
            return Err(LifecycleError::ExistingNotifications(reminder.id));
        }

        if !forced && !reminder.kind.is_recurring() {
            self.guard.delete_reminder(&reminder.id).await?;
            info!(reminder_id = %reminder.id, "Deleted drained one shot reminder");
            return Ok(Rescheduled::Deleted);
        }

        let notifications = expand(reminder, self.now, &self.tz)?;
        Ok(Rescheduled::Expanded(self.persist(reminder, notifications).await?))
    }

    /// Deletes the children of the reminder and then the reminder itself.
    /// Unknown ids touch nothing, in particular not the ad hoc notifications
    /// living under the nil parent.
    pub async fn delete_reminder(&self, reminder_id: &ID) -> Result<Option<Reminder>, LifecycleError> {
        if self.guard.find_reminder(reminder_id).await?.is_none() {
            return Ok(None);
        }
        self.guard.clear_notifications(reminder_id).await?;
        Ok(self.guard.delete_reminder(reminder_id).await?)
    }

    /// Drops `recipient_id` from every reminder. Reminders left without
    /// recipients are deleted, all others are expanded again.
    pub async fn remove_recipient_everywhere(&self, recipient_id: &ID) -> Result<(), LifecycleError> {
        for mut reminder in self.guard.reminders_with_recipient(recipient_id).await? {
            reminder.remove_recipient(recipient_id);
            if reminder.recipients.is_empty() {
                self.delete_reminder(&reminder.id).await?;
                info!(reminder_id = %reminder.id, "Deleted reminder without recipients");
            } else {
                self.change_reminder(&reminder).await?;
            }
        }
        Ok(())
    }

    async fn persist(
        &self,
        reminder: &Reminder,
        notifications: Vec<Notification>,
    ) -> Result<usize, LifecycleError> {
        for notification in &notifications {
            self.guard.upsert_notification(notification).await?;
        }
        if notifications.is_empty() {
            info!(reminder_id = %reminder.id, "No warning time of the reminder is in the future");
        }
        Ok(notifications.len())
    }
}
