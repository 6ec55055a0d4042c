//! Slack incoming-webhook channel. Stateless: every send is one POST.

use async_trait::async_trait;
use serde_json::{Value, json};

use herald_core::error::{HeraldError, Result};
use herald_core::traits::Channel;

const CHANNEL_NAME: &str = "slack";

/// Placeholder left by the sample config; treated as unconfigured.
const PLACEHOLDER: &str = "YOUR/WEBHOOK/URL";

pub struct SlackChannel {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackChannel {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Plain `{text}` message.
    pub async fn send_plain(&self, text: &str) -> Result<()> {
        self.post(&json!({ "text": text })).await
    }

    /// Rich message: header block, divider, markdown section.
    pub async fn send_rich(&self, title: &str, body: &str) -> Result<()> {
        self.post(&build_blocks(title, body)).await
    }

    pub fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty() && !self.webhook_url.contains(PLACEHOLDER)
    }

    async fn post(&self, payload: &Value) -> Result<()> {
        if !self.is_configured() {
            return Err(HeraldError::channel(
                CHANNEL_NAME,
                "webhook URL not configured",
            ));
        }

        let response = self
            .client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| HeraldError::channel(CHANNEL_NAME, format!("webhook send failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("slack message sent");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(HeraldError::channel(
                CHANNEL_NAME,
                format!("webhook returned {status}: {body}"),
            ))
        }
    }
}

#[async_trait]
impl Channel for SlackChannel {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    fn is_configured(&self) -> bool {
        SlackChannel::is_configured(self)
    }

    async fn notify(&self, title: &str, body: &str) -> Result<()> {
        self.send_rich(title, body).await
    }
}

fn build_blocks(title: &str, body: &str) -> Value {
    json!({
        "blocks": [
            {
                "type": "header",
                "text": { "type": "plain_text", "text": title }
            },
            { "type": "divider" },
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": body }
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_configured() {
        assert!(!SlackChannel::new("").is_configured());
        assert!(
            !SlackChannel::new("https://hooks.slack.com/services/YOUR/WEBHOOK/URL")
                .is_configured()
        );
        assert!(SlackChannel::new("https://hooks.slack.com/services/T0/B0/xyz").is_configured());
    }

    #[test]
    fn test_blocks_payload_shape() {
        let payload = build_blocks("tech", "a useful tip");
        let blocks = payload["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0]["type"], "header");
        assert_eq!(blocks[0]["text"]["type"], "plain_text");
        assert_eq!(blocks[0]["text"]["text"], "tech");
        assert_eq!(blocks[1]["type"], "divider");
        assert_eq!(blocks[2]["type"], "section");
        assert_eq!(blocks[2]["text"]["type"], "mrkdwn");
        assert_eq!(blocks[2]["text"]["text"], "a useful tip");
    }

    #[tokio::test]
    async fn test_unconfigured_send_fails_without_network() {
        let channel = SlackChannel::new("");
        let err = channel.send_plain("hello").await.unwrap_err();
        match err {
            HeraldError::Channel { channel, reason } => {
                assert_eq!(channel, "slack");
                assert!(reason.contains("not configured"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
