mod journal;

use crate::repos::{INotificationRepo, IRecipientRepo, IReminderRepo, Repos};
use chrono::{DateTime, Utc};
pub use journal::{LockEvent, LockJournal, LockMode, LockOrderViolation, LockSpace};
use notifier_domain::{Notification, Recipient, Reminder, ID};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Reminders together with the notifications expanded from them. Both live
/// behind a single lock so that a reminder and its children are always
/// changed atomically.
pub struct ReminderSpace {
    reminders: Arc<dyn IReminderRepo>,
    notifications: Arc<dyn INotificationRepo>,
}

pub struct AddressBookSpace {
    recipients: Arc<dyn IRecipientRepo>,
}

struct Locks {
    reminder_space: RwLock<ReminderSpace>,
    address_book: RwLock<AddressBookSpace>,
}

/// Access point to all persistent state.
///
/// Whenever both spaces are needed the reminder space has to be locked first.
/// The address book is therefore only reachable through a reminder space
/// guard (`ReminderReadGuard::address_book`, `ReminderWriteGuard::address_book_mut`)
/// or standalone through `Store::address_book`, which offers no way back into
/// the reminder space.
#[derive(Clone)]
pub struct Store {
    locks: Arc<Locks>,
    journal: Option<Arc<LockJournal>>,
}

impl Store {
    pub fn new(repos: &Repos) -> Self {
        Self {
            locks: Arc::new(Locks {
                reminder_space: RwLock::new(ReminderSpace {
                    reminders: repos.reminders.clone(),
                    notifications: repos.notifications.clone(),
                }),
                address_book: RwLock::new(AddressBookSpace {
                    recipients: repos.recipients.clone(),
                }),
            }),
            journal: None,
        }
    }

    /// A handle on the same locks which records its lock traffic in `journal`
    pub fn audited(&self, journal: Arc<LockJournal>) -> Self {
        Self {
            locks: self.locks.clone(),
            journal: Some(journal),
        }
    }

    fn record(&self, event: LockEvent) {
        if let Some(journal) = &self.journal {
            journal.record(event);
        }
    }

    pub async fn read(&self) -> ReminderReadGuard<'_> {
        let space = self.locks.reminder_space.read().await;
        self.record(LockEvent::Acquired(LockSpace::Reminders, LockMode::Read));
        ReminderReadGuard { space, store: self }
    }

    pub async fn write(&self) -> ReminderWriteGuard<'_> {
        let space = self.locks.reminder_space.write().await;
        self.record(LockEvent::Acquired(LockSpace::Reminders, LockMode::Write));
        ReminderWriteGuard { space, store: self }
    }

    pub async fn address_book(&self) -> AddressBookReadGuard<'_> {
        let book = self.locks.address_book.read().await;
        self.record(LockEvent::Acquired(LockSpace::AddressBook, LockMode::Read));
        AddressBookReadGuard { book, store: self }
    }

    pub async fn address_book_mut(&self) -> AddressBookWriteGuard<'_> {
        let book = self.locks.address_book.write().await;
        self.record(LockEvent::Acquired(LockSpace::AddressBook, LockMode::Write));
        AddressBookWriteGuard { book, store: self }
    }
}

/// Queries available under both reminder space guards
#[async_trait::async_trait]
pub trait ReminderSpaceRead: Sync {
    fn space(&self) -> &ReminderSpace;

    async fn find_reminder(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        self.space().reminders.find(reminder_id).await
    }

    async fn all_reminders(&self) -> anyhow::Result<Vec<Reminder>> {
        self.space().reminders.find_all().await
    }

    async fn reminders_with_recipient(&self, recipient_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        self.space().reminders.find_by_recipient(recipient_id).await
    }

    async fn find_notification(&self, notification_id: &ID) -> anyhow::Result<Option<Notification>> {
        self.space().notifications.find(notification_id).await
    }

    async fn all_notifications(&self) -> anyhow::Result<Vec<Notification>> {
        self.space().notifications.find_all().await
    }

    async fn expired_notifications(&self, as_of: DateTime<Utc>) -> anyhow::Result<Vec<ID>> {
        self.space().notifications.find_expired(as_of).await
    }

    async fn count_siblings(&self, parent_id: &ID) -> anyhow::Result<usize> {
        self.space().notifications.count_siblings(parent_id).await
    }
}

pub struct ReminderReadGuard<'a> {
    space: RwLockReadGuard<'a, ReminderSpace>,
    store: &'a Store,
}

impl<'a> ReminderReadGuard<'a> {
    pub async fn address_book(&self) -> AddressBookReadGuard<'_> {
        self.store.address_book().await
    }
}

impl<'a> ReminderSpaceRead for ReminderReadGuard<'a> {
    fn space(&self) -> &ReminderSpace {
        &self.space
    }
}

impl<'a> Drop for ReminderReadGuard<'a> {
    fn drop(&mut self) {
        self.store.record(LockEvent::Released(LockSpace::Reminders));
    }
}

pub struct ReminderWriteGuard<'a> {
    space: RwLockWriteGuard<'a, ReminderSpace>,
    store: &'a Store,
}

impl<'a> ReminderWriteGuard<'a> {
    pub async fn address_book(&self) -> AddressBookReadGuard<'_> {
        self.store.address_book().await
    }

    pub async fn address_book_mut(&self) -> AddressBookWriteGuard<'_> {
        self.store.address_book_mut().await
    }

    pub async fn upsert_reminder(&self, reminder: &Reminder) -> anyhow::Result<()> {
        self.space.reminders.upsert(reminder).await
    }

    pub async fn delete_reminder(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        self.space.reminders.delete(reminder_id).await
    }

    pub async fn upsert_notification(&self, notification: &Notification) -> anyhow::Result<()> {
        self.space.notifications.upsert(notification).await
    }

    pub async fn delete_notification(&self, notification_id: &ID) -> anyhow::Result<Option<Notification>> {
        self.space.notifications.delete(notification_id).await
    }

    /// Deletes every notification owned by `parent_id`
    pub async fn clear_notifications(&self, parent_id: &ID) -> anyhow::Result<Vec<Notification>> {
        self.space.notifications.delete_by_parent(parent_id).await
    }
}

impl<'a> ReminderSpaceRead for ReminderWriteGuard<'a> {
    fn space(&self) -> &ReminderSpace {
        &self.space
    }
}

impl<'a> Drop for ReminderWriteGuard<'a> {
    fn drop(&mut self) {
        self.store.record(LockEvent::Released(LockSpace::Reminders));
    }
}

/// Queries available under both address book guards
#[async_trait::async_trait]
pub trait AddressBookRead: Sync {
    fn book(&self) -> &AddressBookSpace;

    async fn find_recipient(&self, recipient_id: &ID) -> anyhow::Result<Option<Recipient>> {
        self.book().recipients.find(recipient_id).await
    }

    async fn all_recipients(&self) -> anyhow::Result<Vec<Recipient>> {
        self.book().recipients.find_all().await
    }
}

pub struct AddressBookReadGuard<'a> {
    book: RwLockReadGuard<'a, AddressBookSpace>,
    store: &'a Store,
}

impl<'a> AddressBookRead for AddressBookReadGuard<'a> {
    fn book(&self) -> &AddressBookSpace {
        &self.book
    }
}

impl<'a> Drop for AddressBookReadGuard<'a> {
    fn drop(&mut self) {
        self.store.record(LockEvent::Released(LockSpace::AddressBook));
    }
}

pub struct AddressBookWriteGuard<'a> {
    book: RwLockWriteGuard<'a, AddressBookSpace>,
    store: &'a Store,
}

impl<'a> AddressBookWriteGuard<'a> {
    pub async fn upsert_recipient(&self, recipient: &Recipient) -> anyhow::Result<()> {
        self.book.recipients.upsert(recipient).await
    }

    pub async fn delete_recipient(&self, recipient_id: &ID) -> anyhow::Result<Option<Recipient>> {
        self.book.recipients.delete(recipient_id).await
    }
}

impl<'a> AddressBookRead for AddressBookWriteGuard<'a> {
    fn book(&self) -> &AddressBookSpace {
        &self.book
    }
}

impl<'a> Drop for AddressBookWriteGuard<'a> {
    fn drop(&mut self) {
        self.store.record(LockEvent::Released(LockSpace::AddressBook));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn recipient() -> Recipient {
        Recipient {
            id: ID::new(),
            display_name: "Martin via SMS".into(),
            address: "SendSMS1".into(),
            address_type: "IFTTT".into(),
            is_default: true,
        }
    }

    #[tokio::test]
    async fn nested_address_book_access_keeps_lock_order() {
        let journal = Arc::new(LockJournal::new());
        let store = Store::new(&Repos::create_inmemory()).audited(journal.clone());
        let r = recipient();

        {
            let reminders = store.write().await;
            let book = reminders.address_book_mut().await;
            book.upsert_recipient(&r).await.unwrap();
        }
        {
            let reminders = store.read().await;
            let book = reminders.address_book().await;
            assert!(book.find_recipient(&r.id).await.unwrap().is_some());
            assert!(reminders.all_reminders().await.unwrap().is_empty());
        }

        assert_eq!(journal.verify_order(), Ok(()));
        assert_eq!(
            journal.events(),
            vec![
                LockEvent::Acquired(LockSpace::Reminders, LockMode::Write),
                LockEvent::Acquired(LockSpace::AddressBook, LockMode::Write),
                LockEvent::Released(LockSpace::AddressBook),
                LockEvent::Released(LockSpace::Reminders),
                LockEvent::Acquired(LockSpace::Reminders, LockMode::Read),
                LockEvent::Acquired(LockSpace::AddressBook, LockMode::Read),
                LockEvent::Released(LockSpace::AddressBook),
                LockEvent::Released(LockSpace::Reminders),
            ]
        );
    }

    #[tokio::test]
    async fn journal_detects_inverted_lock_order() {
        let journal = Arc::new(LockJournal::new());
        let store = Store::new(&Repos::create_inmemory()).audited(journal.clone());

        let book = store.address_book().await;
        let reminders = store.read().await;
        drop(reminders);
        drop(book);

        assert_eq!(journal.verify_order(), Err(LockOrderViolation { position: 1 }));
    }

    #[tokio::test]
    async fn unaudited_handles_share_the_same_state() {
        let store = Store::new(&Repos::create_inmemory());
        let audited = store.audited(Arc::new(LockJournal::new()));
        let parent = ID::new();
        let n = Notification {
            id: ID::new(),
            parent,
            warning_time: Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap(),
            description: "Heute 12:00 Test".into(),
            recipient: ID::new(),
        };

        audited.write().await.upsert_notification(&n).await.unwrap();
        assert_eq!(store.read().await.count_siblings(&parent).await.unwrap(), 1);

        let cleared = store.write().await.clear_notifications(&parent).await.unwrap();
        assert_eq!(cleared.len(), 1);
        assert!(audited
            .read()
            .await
            .find_notification(&n.id)
            .await
            .unwrap()
            .is_none());
    }
}
