//! Slack Web API client for posting digest blocks.

use serde::Deserialize;
use shelfwatch_core::config::SlackConfig;
use shelfwatch_core::error::{Result, ShelfwatchError};
use std::time::Duration;

use crate::message::MessageBlock;

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Result of delivering one digest: how many blocks landed, how many did not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostOutcome {
    pub posted: usize,
    pub failed: usize,
}

/// Posts message blocks to a single channel with a bot token.
pub struct SlackClient {
    endpoint: String,
    token: String,
    channel: String,
    http: reqwest::Client,
}

impl SlackClient {
    pub fn new(config: &SlackConfig) -> Result<Self> {
        Self::with_endpoint(POST_MESSAGE_URL, &config.bot_token, &config.channel_id)
    }

    /// Client pointed at an arbitrary endpoint, for tests against a mock
    /// server.
    pub fn with_endpoint(endpoint: &str, token: &str, channel: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("shelfwatch/0.1")
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| ShelfwatchError::Slack(format!("HTTP client error: {e}")))?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            channel: channel.to_string(),
            http,
        })
    }

    /// Post one block as a single chat.postMessage call. The header doubles
    /// as the notification fallback text.
    pub async fn post_block(&self, block: &MessageBlock) -> Result<()> {
        let mut sections = vec![section(&block.header)];
        if !block.body.is_empty() {
            sections.push(section(&block.body));
        }
        let payload = serde_json::json!({
            "channel": self.channel,
            "text": block.header,
            "blocks": sections,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json; charset=utf-8")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ShelfwatchError::Slack(format!("chat.postMessage failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ShelfwatchError::Slack(format!(
                "API error {status}: {body}"
            )));
        }

        let body: SlackApiResponse = response
            .json()
            .await
            .map_err(|e| ShelfwatchError::Slack(format!("Invalid response: {e}")))?;

        if !body.ok {
            return Err(ShelfwatchError::Slack(format!(
                "API rejected message: {}",
                body.error.unwrap_or_else(|| "unknown".into())
            )));
        }
        Ok(())
    }

    /// Post the whole digest in order, pausing `delay` between consecutive
    /// posts. Delivery is best-effort: a failed block is logged and the
    /// remaining blocks are still attempted.
    pub async fn post_digest(&self, blocks: &[MessageBlock], delay: Duration) -> PostOutcome {
        let mut outcome = PostOutcome::default();
        for (idx, block) in blocks.iter().enumerate() {
            if idx > 0 {
                tokio::time::sleep(delay).await;
            }
            match self.post_block(block).await {
                Ok(()) => outcome.posted += 1,
                Err(e) => {
                    tracing::error!("Block {} of {} not delivered: {e}", idx + 1, blocks.len());
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }
}

fn section(text: &str) -> serde_json::Value {
    serde_json::json!({ "type": "section", "text": { "type": "mrkdwn", "text": text } })
}

#[derive(Debug, Deserialize)]
struct SlackApiResponse {
    ok: bool,
    error: Option<String>,
}
