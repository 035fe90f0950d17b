use super::{ISender, MAX_MESSAGE_CHARS};
use notifier_utils::truncate_chars;
use tracing::info;

/// Logs messages instead of delivering them
pub struct DummySender {
    name: String,
}

impl DummySender {
    pub fn new() -> Self {
        Self::named("dummy")
    }

    pub fn named(name: &str) -> Self {
        Self { name: name.into() }
    }
}

impl Default for DummySender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISender for DummySender {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, address: &str, message: &str) -> anyhow::Result<()> {
        info!(
            sender = %self.name,
            address,
            message = truncate_chars(message, MAX_MESSAGE_CHARS),
            "Dummy delivery"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn it_always_delivers() {
        assert_eq!(DummySender::new().name(), "dummy");
        let sender = DummySender::named("push");
        assert_eq!(sender.name(), "push");
        assert!(sender.send("SendPush1", "Heute 12:00 Zahnarzt").await.is_ok());
    }
}
