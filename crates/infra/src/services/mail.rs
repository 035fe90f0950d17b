use super::{ISender, MAX_MESSAGE_CHARS};
use crate::config::MailConfig;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use notifier_utils::truncate_chars;
use tracing::error;

/// Delivers notifications as plain text mails through an SMTP relay
pub struct MailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    sender_address: String,
    subject: String,
}

impl MailSender {
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)?
            .port(config.port)
            .credentials(Credentials::new(
                config.sender_address.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            mailer,
            sender_address: config.sender_address.clone(),
            subject: config.subject.clone(),
        })
    }

    fn build_message(&self, address: &str, message: &str) -> anyhow::Result<Message> {
        Ok(Message::builder()
            .from(self.sender_address.parse()?)
            .to(address.parse()?)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(truncate_chars(message, MAX_MESSAGE_CHARS).to_string())?)
    }
}

#[async_trait::async_trait]
impl ISender for MailSender {
    fn name(&self) -> &str {
        "mail"
    }

    async fn send(&self, address: &str, message: &str) -> anyhow::Result<()> {
        let email = self.build_message(address, message)?;
        self.mailer.send(email).await.map_err(|e| {
            error!("[Network Error] SMTP relay error. Error message: {:?}", e);
            anyhow::Error::new(e)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> MailSender {
        MailSender::new(&MailConfig {
            server: "smtp.example.com".into(),
            port: 587,
            sender_address: "notifier@example.com".into(),
            password: "pw".into(),
            subject: "Benachrichtigung".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn it_builds_plain_text_mails() {
        let mail = sender()
            .build_message("someone@example.com", "Heute 12:00 Sport")
            .unwrap();
        let raw = String::from_utf8(mail.formatted()).unwrap();
        assert!(raw.contains("From: notifier@example.com"));
        assert!(raw.contains("To: someone@example.com"));
        assert!(raw.contains("Subject: Benachrichtigung"));
        assert!(raw.contains("Heute 12:00 Sport"));
    }

    #[tokio::test]
    async fn it_rejects_invalid_addresses() {
        assert!(sender().build_message("not an address", "Test").is_err());
    }
}
