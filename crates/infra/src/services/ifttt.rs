use super::{ISender, MAX_MESSAGE_CHARS};
use notifier_utils::truncate_chars;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

const IFTTT_BASE_URL: &str = "https://maker.ifttt.com/trigger";

#[derive(Debug, Serialize)]
struct IftttBody<'a> {
    value1: &'a str,
}

/// Triggers an IFTTT maker webhook. The recipient address is the event name
/// of the webhook.
pub struct IftttSender {
    client: Client,
    api_key: String,
}

impl IftttSender {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl ISender for IftttSender {
    fn name(&self) -> &str {
        "IFTTT"
    }

    async fn send(&self, address: &str, message: &str) -> anyhow::Result<()> {
        let body = IftttBody {
            value1: truncate_chars(message, MAX_MESSAGE_CHARS),
        };
        let res = self
            .client
            .post(&format!("{}/{}/with/key/{}", IFTTT_BASE_URL, address, self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] IFTTT webhook error. Error message: {:?}", e);
                anyhow::Error::new(e)
            })?;

        if !res.status().is_success() {
            return Err(anyhow::anyhow!(
                "IFTTT responded with status code {}",
                res.status()
            ));
        }
        Ok(())
    }
}
