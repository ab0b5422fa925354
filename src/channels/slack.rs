//! Slack notifier — posts alerts through the Web API `chat.postMessage`.
//!
//! Each alert is a single `section` block of `mrkdwn` text. Delivery is
//! best-effort: failures are returned to the caller, never retried here.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::NotifyError;
use crate::pipeline::event::EventType;
use crate::pipeline::types::Notifier;

/// Default Slack Web API base URL.
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

/// Slack notifier configuration.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub bot_token: SecretString,
    pub channel: String,
    pub api_base: String,
}

/// Render an infrastructure-failure alert.
pub fn format_error_alert(message: &str) -> String {
    format!("*EventHandler Error Notification*\n {message}")
}

/// Render an event alert for one recipient.
pub fn format_event_alert(event_type: EventType, message: &str, address: &str) -> String {
    format!(
        "*Event Notification*\n  EventType: {event_type}\n  EmailAddress: {address}\n  Message: {message}"
    )
}

/// Build the `chat.postMessage` request body.
fn message_body(channel: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "channel": channel,
        "text": text,
        "blocks": [{
            "type": "section",
            "text": { "type": "mrkdwn", "text": text }
        }]
    })
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackNotifier {
    config: SlackConfig,
    client: reqwest::Client,
}

impl SlackNotifier {
    pub fn new(config: SlackConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/{method}", self.config.api_base.trim_end_matches('/'))
    }

    async fn post_message(&self, text: &str) -> Result<(), NotifyError> {
        let send_failed = |reason: String| NotifyError::SendFailed {
            channel: self.config.channel.clone(),
            reason,
        };

        let resp = self
            .client
            .post(self.api_url("chat.postMessage"))
            .bearer_auth(self.config.bot_token.expose_secret())
            .json(&message_body(&self.config.channel, text))
            .send()
            .await
            .map_err(|e| send_failed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(send_failed(format!("HTTP {status}: {body}")));
        }

        // Slack reports API-level failures with 200 and `"ok": false`.
        let parsed: SlackResponse = resp
            .json()
            .await
            .map_err(|e| send_failed(format!("invalid response: {e}")))?;
        if !parsed.ok {
            return Err(NotifyError::Rejected {
                channel: self.config.channel.clone(),
                error: parsed.error.unwrap_or_else(|| "unknown_error".into()),
            });
        }

        tracing::debug!(channel = %self.config.channel, "Slack alert posted");
        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify_event(
        &self,
        event_type: EventType,
        message: &str,
        address: &str,
    ) -> Result<(), NotifyError> {
        self.post_message(&format_event_alert(event_type, message, address))
            .await
    }

    async fn notify_error(&self, message: &str) -> Result<(), NotifyError> {
        self.post_message(&format_error_alert(message)).await
    }
}
