mod address_book;
mod config;
mod metrics;
mod repos;
mod services;
mod store;
mod system;

pub use address_book::AddressBook;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
pub use config::{Config, LocalSenderConfig, MailConfig, TokenConfig};
pub use metrics::{MetricsCollector, METRIC_NOTIFICATIONS_SENT, METRIC_TICKS};
use notifier_domain::Recipient;
pub use repos::{
    INotificationRepo, IRecipientRepo, IReminderRepo, InMemoryNotificationRepo,
    InMemoryRecipientRepo, InMemoryReminderRepo, Repos, SqliteDatabase,
    SqliteNotificationRepo, SqliteRecipientRepo, SqliteReminderRepo,
};
pub use services::*;
use std::sync::Arc;
pub use store::{
    AddressBookRead, AddressBookReadGuard, AddressBookWriteGuard, LockEvent, LockJournal,
    LockMode, LockOrderViolation, LockSpace, ReminderReadGuard, ReminderSpaceRead,
    ReminderWriteGuard, Store,
};
pub use system::{ISys, RealSys, StaticTimeSys};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Clone)]
pub struct NotifierContext {
    pub store: Store,
    pub senders: Arc<Senders>,
    pub metrics: Arc<MetricsCollector>,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl NotifierContext {
    /// In-memory context with the transports described by `config`
    pub fn create(config: Config) -> Self {
        Self::with_repos(config, &Repos::create_inmemory())
    }

    pub fn with_repos(config: Config, repos: &Repos) -> Self {
        let senders = senders_from_config(&config);
        Self {
            store: Store::new(repos),
            senders: Arc::new(senders),
            metrics: Arc::new(MetricsCollector::new()),
            config,
            sys: Arc::new(RealSys {}),
        }
    }

    /// Context sharing everything but the `Store` handle, which records its
    /// lock traffic in `journal`
    pub fn audited(&self, journal: Arc<LockJournal>) -> Self {
        Self {
            store: self.store.audited(journal),
            ..self.clone()
        }
    }
}

fn senders_from_config(config: &Config) -> Senders {
    let mut senders = Senders::new(TYPE_IFTTT);
    senders.register(TYPE_DUMMY, Arc::new(DummySender::new()));

    match &config.ifttt_api_key {
        Some(key) => senders.register(TYPE_IFTTT, Arc::new(IftttSender::new(key.clone()))),
        None => {
            warn!("Did not find IFTTT_API_KEY environment variable, IFTTT recipients are served by the dummy transport.");
            senders.register(TYPE_IFTTT, Arc::new(DummySender::new()));
        }
    }

    if let Some(local) = &config.local_sender {
        info!("Local SMS gateway configured at {}", local.url);
        senders.register(TYPE_LOCAL, Arc::new(LocalSmsSender::new(local)));
    }

    if let Some(mail) = &config.mail {
        match MailSender::new(mail) {
            Ok(sender) => {
                info!("Mail transport configured via {}:{}", mail.server, mail.port);
                senders.register(TYPE_MAIL, Arc::new(sender));
            }
            Err(e) => warn!("Unable to set up the mail transport: {}", e),
        }
    }

    senders
}

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("address book seed is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("address book seed is not a json list of recipients: {0}")]
    Format(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub fn decode_address_book_seed(seed: &str) -> Result<Vec<Recipient>, SeedError> {
    let raw = BASE64.decode(seed.trim().as_bytes())?;
    Ok(serde_json::from_slice(&raw)?)
}

/// Merges the recipients of `MN_ADDR_BOOK` into the address book
pub async fn seed_address_book(ctx: &NotifierContext) -> Result<usize, SeedError> {
    let seed = match &ctx.config.address_book_seed {
        Some(seed) => seed,
        None => return Ok(0),
    };
    let recipients = decode_address_book_seed(seed)?;

    let book = ctx.store.address_book_mut().await;
    for recipient in &recipients {
        book.upsert_recipient(recipient).await?;
    }
    info!("Merged {} recipients into the address book", recipients.len());
    Ok(recipients.len())
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> NotifierContext {
    let config = Config::new();
    let repos = match &config.db_path {
        Some(path) => Repos::create_sqlite(path).expect("Database to be available"),
        None => Repos::create_inmemory(),
    };
    let ctx = NotifierContext::with_repos(config, &repos);
    if let Err(e) = seed_address_book(&ctx).await {
        warn!("Unable to seed the address book: {}", e);
    }
    ctx
}
