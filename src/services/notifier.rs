//! Notification sinks.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TelegramConfig;
use crate::error::{AppError, Result};

/// Somewhere an alert message can be delivered.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver `text`. Returns a short delivery detail on success.
    async fn send(&self, text: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Debug, Deserialize)]
struct TelegramReply {
    #[serde(default)]
    ok: bool,
    description: Option<String>,
    result: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessage {
    message_id: i64,
}

/// Telegram Bot API sink. Messages are sent as HTML.
pub struct TelegramSink {
    client: Client,
    api_url: String,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramSink {
    pub fn new(config: &TelegramConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    async fn send(&self, text: &str) -> Result<String> {
        let (token, chat_id) = match (&self.bot_token, &self.chat_id) {
            (Some(token), Some(chat_id)) => (token, chat_id),
            _ => {
                return Err(AppError::NotificationUnavailable(
                    "telegram token/chat not configured".to_string(),
                ))
            }
        };

        let url = format!("{}/bot{}/sendMessage", self.api_url, token);
        let payload = SendMessage {
            chat_id,
            text,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::NotificationUnavailable(format!("telegram request failed: {}", e)))?;

        let status = response.status();
        let reply: TelegramReply = response.json().await.map_err(|e| {
            AppError::NotificationUnavailable(format!("telegram returned {} with unreadable body: {}", status, e))
        })?;

        if !reply.ok {
            return Err(AppError::NotificationUnavailable(
                reply
                    .description
                    .unwrap_or_else(|| format!("telegram returned {}", status)),
            ));
        }

        let detail = match reply.result {
            Some(message) => format!("telegram message {}", message.message_id),
            None => "telegram accepted message".to_string(),
        };
        debug!("Alert delivered: {}", detail);
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_sink_reports_not_configured() {
        let sink = TelegramSink::new(&TelegramConfig::default());
        assert!(!sink.is_configured());

        let err = sink.send("hello").await.unwrap_err();
        assert!(matches!(err, AppError::NotificationUnavailable(msg) if msg.contains("not configured")));
    }

    #[tokio::test]
    async fn test_token_without_chat_is_not_configured() {
        let config = TelegramConfig {
            bot_token: Some("123:abc".to_string()),
            ..TelegramConfig::default()
        };
        let sink = TelegramSink::new(&config);
        assert!(!sink.is_configured());
        assert!(sink.send("hello").await.is_err());
    }

    #[test]
    fn test_reply_parsing() {
        let reply: TelegramReply =
            serde_json::from_str(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#)
                .unwrap();
        assert!(!reply.ok);
        assert_eq!(reply.description.as_deref(), Some("Unauthorized"));
    }
}
