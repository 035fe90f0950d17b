use super::{ISender, MAX_MESSAGE_CHARS};
use crate::config::LocalSenderConfig;
use notifier_utils::truncate_chars;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: &'a str,
    phone_nr: &'a str,
}

/// Delivers SMS through a gateway on the local network
pub struct LocalSmsSender {
    client: Client,
    url: String,
    token: String,
}

impl LocalSmsSender {
    pub fn new(config: &LocalSenderConfig) -> Self {
        Self {
            client: Client::new(),
            url: config.url.clone(),
            token: config.token.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ISender for LocalSmsSender {
    fn name(&self) -> &str {
        "local"
    }

    async fn send(&self, address: &str, message: &str) -> anyhow::Result<()> {
        let body = SendRequest {
            message: truncate_chars(message, MAX_MESSAGE_CHARS),
            phone_nr: address,
        };
        let res = self
            .client
            .post(&self.url)
            .header("X-Token", &self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] Local SMS gateway error. Error message: {:?}", e);
                anyhow::Error::new(e)
            })?;

        if !res.status().is_success() {
            return Err(anyhow::anyhow!(
                "SMS gateway responded with status code {}",
                res.status()
            ));
        }
        Ok(())
    }
}
