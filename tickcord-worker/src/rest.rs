//! Outbound send path
//!
//! The pump talks to the remote service through [`ChannelSink`] so tests can
//! substitute a recording sink for the real REST client.

use async_trait::async_trait;
use tickcord_core::{Error, Result};

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Destination for outbound messages.
#[async_trait]
pub trait ChannelSink: Send + Sync {
    /// Send one text message to a channel address.
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<()>;
}

/// REST client posting messages with a bot credential.
pub struct DiscordRest {
    http: reqwest::Client,
    token: String,
}

impl DiscordRest {
    pub fn new(token: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { http, token })
    }
}

#[async_trait]
impl ChannelSink for DiscordRest {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<()> {
        let url = format!("{DISCORD_API_BASE}/channels/{channel_id}/messages");
        let payload = serde_json::json!({ "content": content });

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bot {}", self.token))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Send(format!("Request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            Err(Error::Unauthorized(format!(
                "channel {channel_id}: {status} - {error_text}"
            )))
        } else {
            Err(Error::Send(format!(
                "channel {channel_id}: {status} - {error_text}"
            )))
        }
    }
}
