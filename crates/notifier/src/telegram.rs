// In crates/notifier/src/telegram.rs

use crate::error::{Error, Result};
use crate::Notifier;
use app_config::TelegramSettings;
use async_trait::async_trait;
use serde_json::{json, Value};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Delivers reports through the Telegram Bot API.
pub struct TelegramNotifier {
    http_client: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(settings: &TelegramSettings) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            bot_token: settings.bot_token.clone(),
            chat_id: settings.chat_id.clone(),
        }
    }

    /// Posts one `sendMessage` call and checks Telegram's `ok` flag.
    async fn post(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_BASE, self.bot_token);
        let payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });

        let response = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(Error::RequestFailed)?;

        let body: Value = response.json().await.map_err(Error::RequestFailed)?;
        if body.get("ok").and_then(Value::as_bool) == Some(true) {
            Ok(())
        } else {
            let description = body
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("no description")
                .to_string();
            Err(Error::Rejected { description })
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "Telegram"
    }

    async fn send(&self, text: &str) -> bool {
        match self.post(text).await {
            Ok(()) => {
                tracing::info!(chars = text.len(), "Telegram notification delivered");
                true
            }
            Err(e) => {
                // Delivery failures are recovered here; they never fail the run.
                tracing::error!(error = %e, "Failed to deliver Telegram notification");
                false
            }
        }
    }
}
