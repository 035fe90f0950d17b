mod dummy;
mod ifttt;
mod local_sms;
mod mail;

pub use dummy::DummySender;
pub use ifttt::IftttSender;
pub use local_sms::LocalSmsSender;
pub use mail::MailSender;
use notifier_domain::Recipient;
use std::collections::HashMap;
use std::sync::Arc;

/// Transports refuse to deliver more characters than this
pub const MAX_MESSAGE_CHARS: usize = 160;

pub const TYPE_IFTTT: &str = "IFTTT";
pub const TYPE_LOCAL: &str = "local";
pub const TYPE_DUMMY: &str = "Dummy";
pub const TYPE_MAIL: &str = "Mail";

/// A transport that delivers a text message to an address
#[async_trait::async_trait]
pub trait ISender: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, address: &str, message: &str) -> anyhow::Result<()>;
}

/// Transports keyed by the address type of the recipients they serve
pub struct Senders {
    transports: HashMap<String, Arc<dyn ISender>>,
    default_type: String,
}

impl Senders {
    pub fn new(default_type: &str) -> Self {
        Self {
            transports: HashMap::new(),
            default_type: default_type.into(),
        }
    }

    pub fn register(&mut self, address_type: &str, sender: Arc<dyn ISender>) {
        self.transports.insert(address_type.into(), sender);
    }

    /// Transport for `recipient`. Unknown recipients and address types
    /// without a registered transport fall back to the default type.
    pub fn sender_for(&self, recipient: Option<&Recipient>) -> Option<Arc<dyn ISender>> {
        recipient
            .and_then(|r| self.transports.get(&r.address_type))
            .or_else(|| self.transports.get(&self.default_type))
            .cloned()
    }

    pub fn address_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.transports.keys().cloned().collect();
        types.sort();
        types
    }
}
