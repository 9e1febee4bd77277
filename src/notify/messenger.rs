//! Participant direct messages

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::config::MessagingConfig;
use super::errors::{NotifyError, NotifyResult};

/// Sends a direct message to a messaging identity
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn direct_message(&self, handle: &str, text: &str) -> NotifyResult<()>;
}

/// A message captured by [`MockMessenger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub handle: String,
    pub text: String,
}

/// Recording messenger for tests and unconfigured deployments
#[derive(Debug, Default)]
pub struct MockMessenger {
    sent: RwLock<Vec<SentMessage>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.read().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn direct_message(&self, handle: &str, text: &str) -> NotifyResult<()> {
        self.sent
            .write()
            .map_err(|_| NotifyError::Messaging("Lock poisoned".to_string()))?
            .push(SentMessage {
                handle: handle.to_string(),
                text: text.to_string(),
            });
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Slack-compatible `chat.postMessage` client
pub struct SlackMessenger {
    client: reqwest::Client,
    config: MessagingConfig,
}

impl SlackMessenger {
    pub fn new(config: MessagingConfig) -> NotifyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| NotifyError::Messaging(format!("Failed to build client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Messenger for SlackMessenger {
    async fn direct_message(&self, handle: &str, text: &str) -> NotifyResult<()> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.bot_token)
            .json(&json!({ "channel": handle, "text": text }))
            .send()
            .await
            .map_err(|e| NotifyError::Messaging(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Messaging(format!(
                "HTTP {} from messaging API",
                response.status()
            )));
        }

        let body: PostMessageResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::Messaging(format!("Invalid response: {}", e)))?;
        if body.ok {
            Ok(())
        } else {
            Err(NotifyError::Messaging(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

/// Real messenger when configured, recording mock otherwise
pub fn create_messenger(config: Option<MessagingConfig>) -> NotifyResult<Arc<dyn Messenger>> {
    match config {
        Some(cfg) => Ok(Arc::new(SlackMessenger::new(cfg)?)),
        None => Ok(Arc::new(MockMessenger::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::Value;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api/chat.postMessage", addr)
    }

    fn messenger(api_url: String) -> SlackMessenger {
        SlackMessenger::new(MessagingConfig {
            api_url,
            bot_token: "xoxb-test".to_string(),
            timeout_ms: 2_000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_mock_records() {
        let mock = MockMessenger::new();
        mock.direct_message("U1", "hello").await.unwrap();
        assert_eq!(mock.sent_count(), 1);
        assert_eq!(mock.sent()[0].handle, "U1");
    }

    #[tokio::test]
    async fn test_ok_false_is_failure() {
        let router = Router::new().route(
            "/api/chat.postMessage",
            post(|| async { Json(serde_json::json!({"ok": false, "error": "channel_not_found"})) }),
        );
        let url = serve(router).await;
        let err = messenger(url).direct_message("U404", "hi").await.unwrap_err();
        assert!(err.to_string().contains("channel_not_found"));
    }

    #[tokio::test]
    async fn test_posts_channel_and_text() {
        let router = Router::new().route(
            "/api/chat.postMessage",
            post(|Json(body): Json<Value>| async move {
                let ok = body["channel"] == "U1" && body["text"] == "hi";
                Json(serde_json::json!({ "ok": ok }))
            }),
        );
        let url = serve(router).await;
        messenger(url).direct_message("U1", "hi").await.unwrap();
    }
}
