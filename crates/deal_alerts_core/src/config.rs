//! Process-level configuration, read once at cold start and passed to handlers.
//!
//! Absent and blank values are treated the same: the corresponding accessor
//! returns a [`ConfigError`] instead of an empty string.

use std::fmt;

use thiserror::Error;

pub const TELEGRAM_BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";
pub const TELEGRAM_API_BASE_URL_VAR: &str = "TELEGRAM_API_BASE_URL";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DEAL_STORE_ENSURE_SCHEMA_VAR: &str = "DEAL_STORE_ENSURE_SCHEMA";
pub const DEFAULT_TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Telegram credentials not configured")]
    MissingTelegramCredentials,
    #[error("Database URL not configured")]
    MissingDatabaseUrl,
}

#[derive(Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    bot_token: Option<String>,
    chat_id: Option<String>,
    pub api_base_url: String,
}

impl NotifierConfig {
    pub fn new(bot_token: Option<String>, chat_id: Option<String>) -> Self {
        Self {
            bot_token: non_blank(bot_token),
            chat_id: non_blank(chat_id),
            api_base_url: DEFAULT_TELEGRAM_API_BASE_URL.to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(
            lookup(TELEGRAM_BOT_TOKEN_VAR),
            lookup(TELEGRAM_CHAT_ID_VAR),
        );
        if let Some(base_url) = non_blank(lookup(TELEGRAM_API_BASE_URL_VAR)) {
            config.api_base_url = base_url.trim_end_matches('/').to_string();
        }
        config
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }

    pub fn credentials(&self) -> Result<TelegramCredentials, ConfigError> {
        match (&self.bot_token, &self.chat_id) {
            (Some(bot_token), Some(chat_id)) => Ok(TelegramCredentials {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            _ => Err(ConfigError::MissingTelegramCredentials),
        }
    }
}

impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("configured", &self.is_configured())
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DealStoreConfig {
    database_url: Option<String>,
    pub ensure_schema: bool,
}

impl DealStoreConfig {
    pub fn new(database_url: Option<String>) -> Self {
        Self {
            database_url: non_blank(database_url),
            ensure_schema: false,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(lookup(DATABASE_URL_VAR));
        config.ensure_schema = lookup(DEAL_STORE_ENSURE_SCHEMA_VAR)
            .map(|value| parse_flag(&value))
            .unwrap_or(false);
        config
    }

    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}

impl fmt::Debug for DealStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DealStoreConfig")
            .field("database_url_configured", &self.database_url.is_some())
            .field("ensure_schema", &self.ensure_schema)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
