use super::INotificationRepo;
use crate::repos::shared::sqlite::{decode_time, encode_time, SqliteDatabase};
use chrono::{DateTime, Utc};
use notifier_domain::{Notification, ID};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use std::convert::TryFrom;
use std::sync::Arc;

pub struct SqliteNotificationRepo {
    db: Arc<SqliteDatabase>,
}

impl SqliteNotificationRepo {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self { db }
    }
}

const COLUMNS: &str = "id, parent, warning_time, description, recipient";

struct NotificationRaw {
    id: String,
    parent: String,
    warning_time: String,
    description: String,
    recipient: String,
}

impl NotificationRaw {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            parent: row.get(1)?,
            warning_time: row.get(2)?,
            description: row.get(3)?,
            recipient: row.get(4)?,
        })
    }
}

impl TryFrom<NotificationRaw> for Notification {
    type Error = anyhow::Error;

    fn try_from(raw: NotificationRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: raw.id.parse()?,
            parent: raw.parent.parse()?,
            warning_time: decode_time(&raw.warning_time)?,
            description: raw.description,
            recipient: raw.recipient.parse()?,
        })
    }
}

fn query<P: Params>(conn: &Connection, sql: &str, params: P) -> anyhow::Result<Vec<Notification>> {
    let mut stmt = conn.prepare(sql)?;
    let raws = stmt
        .query_map(params, NotificationRaw::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(Notification::try_from).collect()
}

#[async_trait::async_trait]
impl INotificationRepo for SqliteNotificationRepo {
    async fn upsert(&self, notification: &Notification) -> anyhow::Result<()> {
        self.db.conn().execute(
            &format!(
                "INSERT OR REPLACE INTO notifications ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
                COLUMNS
            ),
            params![
                notification.id.as_string(),
                notification.parent.as_string(),
                encode_time(&notification.warning_time),
                notification.description,
                notification.recipient.as_string(),
            ],
        )?;
        Ok(())
    }

    async fn find(&self, notification_id: &ID) -> anyhow::Result<Option<Notification>> {
        self.db
            .conn()
            .query_row(
                &format!("SELECT {} FROM notifications WHERE id = ?1", COLUMNS),
                params![notification_id.as_string()],
                NotificationRaw::from_row,
            )
            .optional()?
            .map(Notification::try_from)
            .transpose()
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Notification>> {
        query(
            &self.db.conn(),
            &format!("SELECT {} FROM notifications", COLUMNS),
            [],
        )
    }

    async fn find_expired(&self, as_of: DateTime<Utc>) -> anyhow::Result<Vec<ID>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare("SELECT id FROM notifications WHERE warning_time <= ?1")?;
        let ids = stmt
            .query_map(params![encode_time(&as_of)], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        ids.iter()
            .map(|id| id.parse::<ID>().map_err(anyhow::Error::from))
            .collect()
    }

    async fn count_siblings(&self, parent_id: &ID) -> anyhow::Result<usize> {
        let count: i64 = self.db.conn().query_row(
            "SELECT COUNT(*) FROM notifications WHERE parent = ?1",
            params![parent_id.as_string()],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count)?)
    }

    async fn delete(&self, notification_id: &ID) -> anyhow::Result<Option<Notification>> {
        let found = self.find(notification_id).await?;
        if found.is_some() {
            self.db.conn().execute(
                "DELETE FROM notifications WHERE id = ?1",
                params![notification_id.as_string()],
            )?;
        }
        Ok(found)
    }

    async fn delete_by_parent(&self, parent_id: &ID) -> anyhow::Result<Vec<Notification>> {
        let conn = self.db.conn();
        let children = query(
            &conn,
            &format!("SELECT {} FROM notifications WHERE parent = ?1", COLUMNS),
            params![parent_id.as_string()],
        )?;
        conn.execute(
            "DELETE FROM notifications WHERE parent = ?1",
            params![parent_id.as_string()],
        )?;
        Ok(children)
    }
}
