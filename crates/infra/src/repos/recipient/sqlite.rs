use super::IRecipientRepo;
use crate::repos::shared::sqlite::SqliteDatabase;
use notifier_domain::{Recipient, ID};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::convert::TryFrom;
use std::sync::Arc;

pub struct SqliteRecipientRepo {
    db: Arc<SqliteDatabase>,
}

impl SqliteRecipientRepo {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self { db }
    }
}

const COLUMNS: &str = "id, display_name, address, addr_type, is_default";

struct RecipientRaw {
    id: String,
    display_name: String,
    address: String,
    addr_type: String,
    is_default: bool,
}

impl RecipientRaw {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            display_name: row.get(1)?,
            address: row.get(2)?,
            addr_type: row.get(3)?,
            is_default: row.get(4)?,
        })
    }
}

impl TryFrom<RecipientRaw> for Recipient {
    type Error = anyhow::Error;

    fn try_from(raw: RecipientRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: raw.id.parse()?,
            display_name: raw.display_name,
            address: raw.address,
            address_type: raw.addr_type,
            is_default: raw.is_default,
        })
    }
}

fn find(conn: &Connection, recipient_id: &ID) -> anyhow::Result<Option<Recipient>> {
    conn.query_row(
        &format!("SELECT {} FROM recipients WHERE id = ?1", COLUMNS),
        params![recipient_id.as_string()],
        RecipientRaw::from_row,
    )
    .optional()?
    .map(Recipient::try_from)
    .transpose()
}

#[async_trait::async_trait]
impl IRecipientRepo for SqliteRecipientRepo {
    async fn upsert(&self, recipient: &Recipient) -> anyhow::Result<()> {
        self.db.conn().execute(
            &format!(
                "INSERT OR REPLACE INTO recipients ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
                COLUMNS
            ),
            params![
                recipient.id.as_string(),
                recipient.display_name,
                recipient.address,
                recipient.address_type,
                recipient.is_default,
            ],
        )?;
        Ok(())
    }

    async fn find(&self, recipient_id: &ID) -> anyhow::Result<Option<Recipient>> {
        find(&self.db.conn(), recipient_id)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Recipient>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&format!("SELECT {} FROM recipients", COLUMNS))?;
        let raws = stmt
            .query_map([], RecipientRaw::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(Recipient::try_from).collect()
    }

    async fn delete(&self, recipient_id: &ID) -> anyhow::Result<Option<Recipient>> {
        let conn = self.db.conn();
        let recipient = find(&conn, recipient_id)?;
        if recipient.is_some() {
            conn.execute(
                "DELETE FROM recipients WHERE id = ?1",
                params![recipient_id.as_string()],
            )?;
        }
        Ok(recipient)
    }
}
