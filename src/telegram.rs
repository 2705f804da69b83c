//! Telegram Bot API notifier.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::TARGET_WEB_REQUEST;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram delivery failures
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// The API answered with a non-success status
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    /// The API answered 2xx but refused the message
    #[error("Telegram API error: {0}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends HTML-formatted text messages to a single chat.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

// The token is part of the endpoint path, so it must never reach a log line.
impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_base", &self.api_base)
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramClient {
    pub fn new(
        client: reqwest::Client,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: TELEGRAM_API_BASE.to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Point the client at a different Bot API host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }

    /// Send one message with `parse_mode=HTML`. Failures are logged and returned, never retried.
    pub async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        match self.post_message(text).await {
            Ok(()) => {
                info!(target: TARGET_WEB_REQUEST, "Message sent to Telegram: {}", text);
                Ok(())
            }
            Err(err) => {
                error!(target: TARGET_WEB_REQUEST, "Failed to send message. Error: {}", err);
                Err(err)
            }
        }
    }

    async fn post_message(&self, text: &str) -> Result<(), NotifyError> {
        let form = [
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "HTML"),
        ];

        let response = self
            .client
            .post(self.endpoint())
            .form(&form)
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NotifyError::Http(e.without_url()))?;

        if !status.is_success() {
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<ApiResponse>(&body) {
            Ok(reply) if !reply.ok => Err(NotifyError::Api(
                reply
                    .description
                    .unwrap_or_else(|| "request was not accepted".to_string()),
            )),
            Ok(_) => Ok(()),
            Err(err) => {
                debug!(target: TARGET_WEB_REQUEST, "Unrecognised sendMessage reply ({}): {}", err, body);
                Ok(())
            }
        }
    }
}
