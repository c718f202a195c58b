use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::events::{
    CallbackQueryEvent, CommandEvent, EventContext, EventDispatcher, HandlerResult,
    TelegramEvent, TextMessageEvent, UpdateEnvelope,
};
use crate::keyboards::OutboundMessage;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport fetch failed: {0}")]
    Fetch(String),
    #[error("transport send failed: {0}")]
    Send(String),
    #[error("transport ack failed: {0}")]
    Acknowledge(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_retries: 5, base_delay_ms: 250, max_delay_ms: 5_000 }
    }
}

impl ReconnectPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

/// The inbound/outbound side of the chat surface. `fetch_updates`
/// returning `None` means the stream is closed and the runner stops.
#[async_trait]
pub trait UpdateTransport: Send + Sync {
    async fn fetch_updates(
        &self,
        offset: i64,
    ) -> Result<Option<Vec<UpdateEnvelope>>, TransportError>;
    async fn send_message(&self, message: &OutboundMessage) -> Result<(), TransportError>;
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError>;
}

#[derive(Default)]
pub struct NoopUpdateTransport;

#[async_trait]
impl UpdateTransport for NoopUpdateTransport {
    async fn fetch_updates(
        &self,
        _offset: i64,
    ) -> Result<Option<Vec<UpdateEnvelope>>, TransportError> {
        Ok(None)
    }

    async fn send_message(&self, _message: &OutboundMessage) -> Result<(), TransportError> {
        Ok(())
    }

    async fn answer_callback(&self, _callback_id: &str) -> Result<(), TransportError> {
        Ok(())
    }
}

pub struct PollRunner {
    transport: Arc<dyn UpdateTransport>,
    dispatcher: EventDispatcher,
    reconnect_policy: ReconnectPolicy,
}

impl PollRunner {
    pub fn new(
        transport: Arc<dyn UpdateTransport>,
        dispatcher: EventDispatcher,
        reconnect_policy: ReconnectPolicy,
    ) -> Self {
        Self { transport, dispatcher, reconnect_policy }
    }

    pub async fn start(&self) -> Result<()> {
        let mut offset = 0_i64;
        let mut attempt = 0_u32;

        loop {
            let batch = match self.transport.fetch_updates(offset).await {
                Ok(Some(batch)) => {
                    attempt = 0;
                    batch
                }
                Ok(None) => {
                    info!("update stream closed; stopping poll loop");
                    return Ok(());
                }
                Err(error) => {
                    warn!(
                        attempt,
                        max_retries = self.reconnect_policy.max_retries,
                        error = %error,
                        "update fetch failed"
                    );

                    if attempt >= self.reconnect_policy.max_retries {
                        warn!(
                            max_retries = self.reconnect_policy.max_retries,
                            "poll retries exhausted; continuing process without crash"
                        );
                        return Ok(());
                    }

                    let delay = self.reconnect_policy.backoff(attempt);
                    attempt += 1;
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    continue;
                }
            };

            for envelope in batch {
                offset = offset.max(envelope.update_id + 1);
                self.process(&envelope).await;
            }
        }
    }

    async fn process(&self, envelope: &UpdateEnvelope) {
        let correlation_id = format!("upd-{}", envelope.update_id);
        info!(
            event_name = "ingress.telegram.update_received",
            update_id = envelope.update_id,
            event_type = ?envelope.event.event_type(),
            correlation_id = %correlation_id,
            "received update"
        );

        if let TelegramEvent::CallbackQuery(event) = &envelope.event {
            // Ack the button press promptly so the client stops its spinner,
            // whatever the dispatch outcome.
            if let Err(error) = self.transport.answer_callback(&event.callback_id).await {
                warn!(
                    event_name = "ingress.telegram.callback_ack",
                    correlation_id = %correlation_id,
                    callback_id = %event.callback_id,
                    error = %error,
                    "failed to answer callback query"
                );
            } else {
                debug!(
                    event_name = "ingress.telegram.callback_ack",
                    correlation_id = %correlation_id,
                    callback_id = %event.callback_id,
                    "answered callback query"
                );
            }
        }

        let context = EventContext { correlation_id: correlation_id.clone() };
        match self.dispatcher.dispatch(envelope, &context).await {
            Ok(HandlerResult::Responded(message)) => {
                if let Err(error) = self.transport.send_message(&message).await {
                    warn!(
                        correlation_id = %correlation_id,
                        chat_id = message.chat_id,
                        error = %error,
                        "failed to send reply; continuing poll loop"
                    );
                }
            }
            Ok(HandlerResult::Processed | HandlerResult::Ignored) => {}
            Err(error) => {
                warn!(
                    correlation_id = %correlation_id,
                    error = %error,
                    "event dispatch failed; continuing poll loop"
                );
            }
        }
    }
}

/// Bot API transport over HTTPS long polling.
pub struct HttpUpdateTransport {
    client: reqwest::Client,
    api_base_url: String,
    bot_token: SecretString,
    poll_timeout_secs: u64,
}

impl HttpUpdateTransport {
    pub fn new(
        api_base_url: impl Into<String>,
        bot_token: SecretString,
        poll_timeout_secs: u64,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            // Long poll plus headroom so the server side times out first.
            .timeout(Duration::from_secs(poll_timeout_secs + 10))
            .build()
            .map_err(|err| TransportError::Fetch(err.to_string()))?;

        Ok(Self { client, api_base_url: api_base_url.into(), bot_token, poll_timeout_secs })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base_url.trim_end_matches('/'),
            self.bot_token.expose_secret()
        )
    }
}

#[async_trait]
impl UpdateTransport for HttpUpdateTransport {
    async fn fetch_updates(
        &self,
        offset: i64,
    ) -> Result<Option<Vec<UpdateEnvelope>>, TransportError> {
        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&[("offset", offset), ("timeout", self.poll_timeout_secs as i64)])
            .send()
            .await
            .map_err(|err| TransportError::Fetch(err.to_string()))?;

        let body: ApiResponse<Vec<RawUpdate>> =
            response.json().await.map_err(|err| TransportError::Fetch(err.to_string()))?;

        if !body.ok {
            return Err(TransportError::Fetch(
                body.description.unwrap_or_else(|| "api returned ok=false".to_owned()),
            ));
        }

        let updates = body.result.unwrap_or_default();
        Ok(Some(updates.into_iter().map(classify_update).collect()))
    }

    async fn send_message(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(message)
            .send()
            .await
            .map_err(|err| TransportError::Send(err.to_string()))?;

        let body: ApiResponse<serde_json::Value> =
            response.json().await.map_err(|err| TransportError::Send(err.to_string()))?;
        if !body.ok {
            return Err(TransportError::Send(
                body.description.unwrap_or_else(|| "api returned ok=false".to_owned()),
            ));
        }
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.method_url("answerCallbackQuery"))
            .json(&serde_json::json!({ "callback_query_id": callback_id }))
            .send()
            .await
            .map_err(|err| TransportError::Acknowledge(err.to_string()))?;

        let body: ApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|err| TransportError::Acknowledge(err.to_string()))?;
        if !body.ok {
            return Err(TransportError::Acknowledge(
                body.description.unwrap_or_else(|| "api returned ok=false".to_owned()),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawUpdate {
    update_id: i64,
    message: Option<RawMessage>,
    callback_query: Option<RawCallbackQuery>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    chat: RawChat,
    from: Option<RawUser>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct RawCallbackQuery {
    id: String,
    from: RawUser,
    message: Option<RawMessage>,
    data: Option<String>,
}

fn classify_update(update: RawUpdate) -> UpdateEnvelope {
    let event = if let Some(callback) = update.callback_query {
        match (callback.data, callback.message) {
            (Some(token), Some(message)) => TelegramEvent::CallbackQuery(CallbackQueryEvent {
                chat_id: message.chat.id,
                user_id: callback.from.id.to_string(),
                callback_id: callback.id,
                token,
            }),
            _ => TelegramEvent::Unsupported { kind: "callback_query_without_payload".to_owned() },
        }
    } else if let Some(message) = update.message {
        match (message.from, message.text) {
            (Some(from), Some(text)) => {
                if let Some(command) = parse_command(&text) {
                    TelegramEvent::Command(CommandEvent {
                        chat_id: message.chat.id,
                        user_id: from.id.to_string(),
                        command,
                    })
                } else {
                    TelegramEvent::TextMessage(TextMessageEvent {
                        chat_id: message.chat.id,
                        user_id: from.id.to_string(),
                        text,
                    })
                }
            }
            _ => TelegramEvent::Unsupported { kind: "message_without_text".to_owned() },
        }
    } else {
        TelegramEvent::Unsupported { kind: "unknown_update_shape".to_owned() }
    };

    UpdateEnvelope { update_id: update.update_id, event }
}

/// `/start` and `/start@SomeBot` both parse to `start`.
fn parse_command(text: &str) -> Option<String> {
    let first = text.trim().split_whitespace().next()?;
    let name = first.strip_prefix('/')?;
    if name.is_empty() {
        return None;
    }
    let name = name.split('@').next().unwrap_or(name);
    Some(name.to_ascii_lowercase())
}
