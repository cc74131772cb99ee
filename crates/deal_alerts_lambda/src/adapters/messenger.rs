use std::fmt;

use deal_alerts_core::config::TelegramCredentials;
use serde_json::Value;

pub const HTML_PARSE_MODE: &str = "HTML";

/// One `sendMessage` call: credentials plus the rendered text.
#[derive(Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub credentials: TelegramCredentials,
    pub text: String,
    pub parse_mode: &'static str,
    pub disable_web_page_preview: bool,
}

impl SendMessageRequest {
    pub fn html(credentials: TelegramCredentials, text: String) -> Self {
        Self {
            credentials,
            text,
            parse_mode: HTML_PARSE_MODE,
            disable_web_page_preview: false,
        }
    }

    /// Form-urlencoded fields in the order the Bot API documents them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("chat_id", self.credentials.chat_id.clone()),
            ("text", self.text.clone()),
            ("parse_mode", self.parse_mode.to_string()),
            (
                "disable_web_page_preview",
                self.disable_web_page_preview.to_string(),
            ),
        ]
    }
}

impl fmt::Debug for SendMessageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendMessageRequest")
            .field("credentials", &self.credentials)
            .field("text_len", &self.text.chars().count())
            .field("parse_mode", &self.parse_mode)
            .field("disable_web_page_preview", &self.disable_web_page_preview)
            .finish()
    }
}

/// Delivers a message and returns the provider's raw JSON envelope.
///
/// `Err` means the call never produced a JSON envelope (transport failure);
/// provider-side rejections come back as `Ok` with `ok: false`.
pub trait MessageSender {
    fn send_message(&self, request: &SendMessageRequest) -> Result<Value, String>;
}
