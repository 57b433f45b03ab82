//! Telegram Bot API notifier

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::ports::{NotifierPort, NotifyError};

/// Default Bot API base URL
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram notifier configuration
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub api_base: String,
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub timeout: Duration,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: TELEGRAM_API_BASE.to_string(),
            bot_token: None,
            chat_id: None,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

/// Sends plain-text messages through `sendMessage`
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    config: TelegramConfig,
    http: Client,
}

impl TelegramNotifier {
    /// Create a new notifier
    pub fn new(config: TelegramConfig) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifyError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    fn credentials(&self) -> Result<(&str, &str), NotifyError> {
        let token = non_empty(&self.config.bot_token)
            .ok_or_else(|| NotifyError::MissingCredentials("bot token".into()))?;
        let chat_id = non_empty(&self.config.chat_id)
            .ok_or_else(|| NotifyError::MissingCredentials("chat id".into()))?;
        Ok((token, chat_id))
    }
}

#[async_trait]
impl NotifierPort for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let (token, chat_id) = self.credentials()?;
        if text.trim().is_empty() {
            return Err(NotifyError::Rejected("empty message".into()));
        }

        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            token
        );
        let payload = SendMessage {
            chat_id,
            text,
            disable_web_page_preview: true,
        };

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(NotifyError::Rejected(format!("HTTP {}: {}", status, describe(&body))));
        }
        if body.get("ok").and_then(Value::as_bool) != Some(true) {
            return Err(NotifyError::Rejected(describe(&body)));
        }

        tracing::debug!("Telegram message delivered to chat {}", chat_id);
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn describe(body: &Value) -> String {
    body.get("description")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    fn config(api_base: String) -> TelegramConfig {
        TelegramConfig {
            api_base,
            bot_token: Some("123:abc".into()),
            chat_id: Some("42".into()),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let notifier = TelegramNotifier::new(TelegramConfig::default()).unwrap();
        let err = notifier.notify("hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::MissingCredentials(_)));

        let blank_chat = TelegramConfig {
            chat_id: Some("   ".into()),
            ..config(TELEGRAM_API_BASE.into())
        };
        let notifier = TelegramNotifier::new(blank_chat).unwrap();
        assert_eq!(
            notifier.notify("hello").await,
            Err(NotifyError::MissingCredentials("chat id".into()))
        );
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let notifier = TelegramNotifier::new(config(TELEGRAM_API_BASE.into())).unwrap();
        let err = notifier.notify("  ").await.unwrap_err();
        assert!(matches!(err, NotifyError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_delivered() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"ok":true,"result":{}}"#).await;
        let notifier = TelegramNotifier::new(config(base)).unwrap();
        assert!(notifier.notify("EXIT | z=0.40").await.is_ok());
    }

    #[tokio::test]
    async fn test_api_rejection() {
        let base = serve_once(
            "HTTP/1.1 400 Bad Request",
            r#"{"ok":false,"description":"Bad Request: chat not found"}"#,
        )
        .await;
        let notifier = TelegramNotifier::new(config(base)).unwrap();
        match notifier.notify("hello").await {
            Err(NotifyError::Rejected(msg)) => assert!(msg.contains("chat not found")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ok_false_rejected() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"ok":false}"#).await;
        let notifier = TelegramNotifier::new(config(base)).unwrap();
        assert!(matches!(notifier.notify("hello").await, Err(NotifyError::Rejected(_))));
    }
}
