use super::IReminderRepo;
use crate::repos::shared::sqlite::{decode_time, encode_time, SqliteDatabase};
use notifier_domain::{Reminder, ReminderKind, ID};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use std::convert::TryFrom;
use std::sync::Arc;

pub struct SqliteReminderRepo {
    db: Arc<SqliteDatabase>,
}

impl SqliteReminderRepo {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self { db }
    }
}

const COLUMNS: &str = "id, kind, param, warning_at, spec, description, recipients";

struct ReminderRaw {
    id: String,
    kind: i64,
    param: i64,
    warning_at: String,
    spec: String,
    description: String,
    recipients: String,
}

impl ReminderRaw {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            param: row.get(2)?,
            warning_at: row.get(3)?,
            spec: row.get(4)?,
            description: row.get(5)?,
            recipients: row.get(6)?,
        })
    }
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: raw.id.parse()?,
            kind: ReminderKind::try_from(raw.kind)?,
            param: raw.param,
            warning_at: serde_json::from_str(&raw.warning_at)?,
            spec: decode_time(&raw.spec)?,
            description: raw.description,
            recipients: serde_json::from_str(&raw.recipients)?,
        })
    }
}

fn query<P: Params>(conn: &Connection, sql: &str, params: P) -> anyhow::Result<Vec<Reminder>> {
    let mut stmt = conn.prepare(sql)?;
    let raws = stmt
        .query_map(params, ReminderRaw::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(Reminder::try_from).collect()
}

fn find(conn: &Connection, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
    conn.query_row(
        &format!("SELECT {} FROM reminders WHERE id = ?1", COLUMNS),
        params![reminder_id.as_string()],
        ReminderRaw::from_row,
    )
    .optional()?
    .map(Reminder::try_from)
    .transpose()
}

#[async_trait::async_trait]
impl IReminderRepo for SqliteReminderRepo {
    async fn upsert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let kind: i64 = reminder.kind.into();
        self.db.conn().execute(
            &format!(
                "INSERT OR REPLACE INTO reminders ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                COLUMNS
            ),
            params![
                reminder.id.as_string(),
                kind,
                reminder.param,
                serde_json::to_string(&reminder.warning_at)?,
                encode_time(&reminder.spec),
                reminder.description,
                serde_json::to_string(&reminder.recipients)?,
            ],
        )?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        find(&self.db.conn(), reminder_id)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>> {
        query(
            &self.db.conn(),
            &format!("SELECT {} FROM reminders", COLUMNS),
            [],
        )
    }

    async fn find_by_recipient(&self, recipient_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        let all = self.find_all().await?;
        Ok(all
            .into_iter()
            .filter(|reminder| reminder.has_recipient(recipient_id))
            .collect())
    }

    async fn delete(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        let conn = self.db.conn();
        let reminder = find(&conn, reminder_id)?;
        if reminder.is_some() {
            conn.execute(
                "DELETE FROM reminders WHERE id = ?1",
                params![reminder_id.as_string()],
            )?;
        }
        Ok(reminder)
    }
}
