use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde_json::json;
use tracing::debug;

/// Incoming-webhook client for a chat space.
#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: &str) -> Result<Self> {
        if !url.starts_with("https://") {
            bail!("Webhook URL must use HTTPS");
        }

        let client = Client::builder()
            .user_agent("standup-bot")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Post `text` once. Non-2xx responses are errors carrying the body.
    pub async fn send(&self, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .json(&json!({ "text": text }))
            .send()
            .await
            .context("Webhook request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Webhook returned {}: {}", status, body);
        }

        debug!(status = %status, bytes = text.len(), "Webhook accepted message");
        Ok(())
    }
}
