//! # Telegram Channel
//!
//! [`NotificationChannel`] over the Bot API `sendMessage` method.

use std::time::Duration;

use async_trait::async_trait;
use lotto_generation::{NotificationChannel, NotificationError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API client.
pub struct TelegramChannel {
    client: Client,
    api_base: String,
    bot_token: String,
}

impl TelegramChannel {
    pub fn new(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    async fn send_text(&self, destination: &str, body: &str) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(self.send_message_url())
            .json(&SendMessage {
                chat_id: destination,
                text: body,
            })
            .send()
            .await
            // reqwest errors embed the URL, which carries the token.
            .map_err(|e| NotificationError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| NotificationError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body: raw,
            });
        }

        match serde_json::from_str::<ApiResponse>(&raw) {
            Ok(parsed) if parsed.ok => {
                debug!(chat_id = destination, chars = body.chars().count(), "Telegram message sent");
                Ok(())
            }
            Ok(parsed) => Err(NotificationError::Rejected {
                status: status.as_u16(),
                body: parsed.description.unwrap_or(raw),
            }),
            Err(e) => Err(NotificationError::Transport(format!(
                "unreadable sendMessage response: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeTelegram {
        received: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
    }

    async fn send_message(
        State(fake): State<FakeTelegram>,
        Path(bot): Path<String>,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        fake.received.lock().unwrap().push((bot.clone(), body));
        match bot.as_str() {
            "botgood" => (StatusCode::OK, Json(serde_json::json!({"ok": true, "result": {}}))),
            "botsoft" => (
                StatusCode::OK,
                Json(serde_json::json!({"ok": false, "description": "chat not found"})),
            ),
            _ => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"ok": false, "description": "Unauthorized"})),
            ),
        }
    }

    async fn spawn_fake() -> (String, FakeTelegram) {
        let fake = FakeTelegram::default();
        let app = Router::new()
            .route("/:bot/sendMessage", post(send_message))
            .with_state(fake.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), fake)
    }

    #[tokio::test]
    async fn test_send_message_posts_chat_and_text() {
        let (base, fake) = spawn_fake().await;
        let channel = TelegramChannel::new(&base, "good", Duration::from_secs(5)).unwrap();

        channel.send_text("-1001", "hello").await.unwrap();

        let received = fake.received.lock().unwrap().clone();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0, "botgood");
        assert_eq!(received[0].1["chat_id"], "-1001");
        assert_eq!(received[0].1["text"], "hello");
    }

    #[tokio::test]
    async fn test_http_error_is_rejected() {
        let (base, _fake) = spawn_fake().await;
        let channel = TelegramChannel::new(&base, "bad", Duration::from_secs(5)).unwrap();

        let err = channel.send_text("-1001", "hello").await.unwrap_err();
        assert!(matches!(err, NotificationError::Rejected { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_ok_false_is_rejected() {
        let (base, _fake) = spawn_fake().await;
        let channel = TelegramChannel::new(&base, "soft", Duration::from_secs(5)).unwrap();

        match channel.send_text("-1001", "hello").await {
            Err(NotificationError::Rejected { status, body }) => {
                assert_eq!(status, 200);
                assert_eq!(body, "chat not found");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let channel =
            TelegramChannel::new("http://127.0.0.1:9", "good", Duration::from_secs(2)).unwrap();
        let err = channel.send_text("-1001", "hello").await.unwrap_err();
        match err {
            NotificationError::Transport(message) => assert!(!message.contains("botgood")),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_url_building() {
        let channel =
            TelegramChannel::new("https://api.telegram.org/", "123:abc", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            channel.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }
}
