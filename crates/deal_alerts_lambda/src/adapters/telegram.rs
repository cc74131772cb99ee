use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use super::messenger::{MessageSender, SendMessageRequest};

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("{0}")]
    Http(#[source] reqwest::Error),
    #[error("Telegram returned a non-JSON response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Bot API client. Requests use the transport defaults; there is no retry.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    api_base_url: String,
}

impl TelegramClient {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn send_message_url(&self, bot_token: &str) -> String {
        format!("{}/bot{bot_token}/sendMessage", self.api_base_url)
    }

    pub async fn send(&self, request: &SendMessageRequest) -> Result<Value, TelegramError> {
        let response = self
            .client
            .post(self.send_message_url(&request.credentials.bot_token))
            .form(&request.form_fields())
            .send()
            .await
            .map_err(|error| TelegramError::Http(error.without_url()))?;

        // Rejections arrive as 4xx with an `ok: false` envelope, so the status is not checked.
        response
            .json::<Value>()
            .await
            .map_err(|error| TelegramError::Decode(error.without_url()))
    }
}

impl MessageSender for TelegramClient {
    fn send_message(&self, request: &SendMessageRequest) -> Result<Value, String> {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                self.send(request).await.map_err(|error| error.to_string())
            })
        })
    }
}
