use chrono::prelude::*;
use chrono_tz::Europe::Berlin;
use notifier_domain::{Recipient, ID};
use notifier_infra::{
    Config, ISender, LockJournal, NotifierContext, Senders, StaticTimeSys, TYPE_IFTTT,
};
use std::sync::{Arc, Mutex};

pub const API_KEY: &str = "test-api-key";

/// In-memory context frozen at `now` with Berlin as client time zone
pub fn setup_context(now: DateTime<Utc>) -> NotifierContext {
    let mut config = Config::from_lookup(|_| None);
    config.api_key = API_KEY.into();
    config.client_tz = Berlin;
    let mut ctx = NotifierContext::create(config);
    ctx.sys = Arc::new(StaticTimeSys(now));
    ctx
}

/// Same as `setup_context` but every transport is `sender`
pub fn setup_context_with_sender(now: DateTime<Utc>, sender: Arc<dyn ISender>) -> NotifierContext {
    let mut ctx = setup_context(now);
    let mut senders = Senders::new(TYPE_IFTTT);
    senders.register(TYPE_IFTTT, sender);
    ctx.senders = Arc::new(senders);
    ctx
}

pub fn audit(ctx: &NotifierContext) -> (NotifierContext, Arc<LockJournal>) {
    let journal = Arc::new(LockJournal::new());
    (ctx.audited(journal.clone()), journal)
}

pub fn recipient(name: &str) -> Recipient {
    Recipient {
        id: ID::new(),
        display_name: name.into(),
        address: format!("Send{}", name),
        address_type: TYPE_IFTTT.into(),
        is_default: false,
    }
}

pub async fn add_recipients(ctx: &NotifierContext, recipients: &[&Recipient]) {
    let book = ctx.store.address_book_mut().await;
    for r in recipients {
        book.upsert_recipient(r).await.unwrap();
    }
}

#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Default::default())
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ISender for RecordingSender {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, address: &str, message: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((address.to_string(), message.to_string()));
        Ok(())
    }
}

pub struct FailingSender;

#[async_trait::async_trait]
impl ISender for FailingSender {
    fn name(&self) -> &str {
        "failing"
    }

    async fn send(&self, _address: &str, _message: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("gateway unreachable"))
    }
}
