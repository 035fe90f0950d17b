mod notification;
mod recipient;
mod reminder;
mod shared;

pub use notification::{INotificationRepo, InMemoryNotificationRepo, SqliteNotificationRepo};
pub use recipient::{IRecipientRepo, InMemoryRecipientRepo, SqliteRecipientRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo, SqliteReminderRepo};
pub use shared::sqlite::SqliteDatabase;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub notifications: Arc<dyn INotificationRepo>,
    pub recipients: Arc<dyn IRecipientRepo>,
}

impl Repos {
    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            notifications: Arc::new(InMemoryNotificationRepo::new()),
            recipients: Arc::new(InMemoryRecipientRepo::new()),
        }
    }

    /// Repositories backed by the sqlite file at `path`, created on first use
    pub fn create_sqlite(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::from_database(Arc::new(SqliteDatabase::open(path)?)))
    }

    pub fn from_database(db: Arc<SqliteDatabase>) -> Self {
        Self {
            reminders: Arc::new(SqliteReminderRepo::new(db.clone())),
            notifications: Arc::new(SqliteNotificationRepo::new(db.clone())),
            recipients: Arc::new(SqliteRecipientRepo::new(db)),
        }
    }
}
