//! # Slack Notifier
//!
//! Posts operator messages through the Slack Web API. Slack answers most
//! failures with HTTP 200 and `{"ok": false, "error": ..}`, so the `ok` flag is
//! what decides success.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::http::HttpTransport;
use super::{ChatNotifier, ExternalOperationResult};
use crate::config::SlackConfig;
use crate::error::AdapterError;

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: Option<bool>,
    error: Option<String>,
    ts: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SlackNotifier {
    transport: HttpTransport,
    token: String,
    channel: String,
    api_base: String,
}

impl SlackNotifier {
    pub fn new(config: &SlackConfig, transport: HttpTransport) -> Self {
        Self {
            transport,
            token: config.token.clone(),
            channel: config.channels.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    async fn try_post(&self, text: &str) -> Result<Value, AdapterError> {
        let request = self
            .transport
            .client()
            .post(format!("{}/api/chat.postMessage", self.api_base))
            .form(&[
                ("token", self.token.as_str()),
                ("channel", self.channel.as_str()),
                ("text", text),
            ]);
        let response = self.transport.send(request).await?;
        let body: PostMessageResponse = self.transport.decode(response).await?;
        interpret(body)
    }
}

fn interpret(body: PostMessageResponse) -> Result<Value, AdapterError> {
    match body.ok {
        Some(true) => {
            debug!(ts = ?body.ts, "Chat message delivered");
            Ok(json!({ "ts": body.ts }))
        }
        Some(false) => Err(AdapterError::rejected(
            body.error.unwrap_or_else(|| "unknown_error".to_string()),
        )),
        None => Err(AdapterError::malformed(
            "chat response is missing the ok flag",
        )),
    }
}

#[async_trait]
impl ChatNotifier for SlackNotifier {
    #[instrument(skip(self, text), fields(channel = %self.channel))]
    async fn post_message(&self, text: &str) -> ExternalOperationResult {
        self.try_post(text).await.into()
    }
}
