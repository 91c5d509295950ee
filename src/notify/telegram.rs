//! Telegram Bot API transport

use super::{Notifier, NotifyError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Telegram Bot API base URL
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

/// Sends alerts to one chat through a bot
pub struct TelegramNotifier {
    base_url: String,
    token: String,
    chat_id: String,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(
        token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        Self::with_base_url(TELEGRAM_API_URL, token, chat_id, timeout)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
            client,
        })
    }

    fn send_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.token)
    }

    fn payload<'a>(&'a self, text: &'a str) -> SendMessage<'a> {
        SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: true,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        // The request URL embeds the bot token; keep it out of errors and logs.
        let response = self
            .client
            .post(self.send_url())
            .json(&self.payload(text))
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }
        Ok(())
    }
}
