pub mod webhook;

use tracing::{error, info, warn};

use crate::util::config::ChatConfig;
pub use webhook::WebhookClient;

/// Where composed messages go.
#[derive(Clone)]
pub enum Delivery {
    /// Log the message instead of posting it.
    DryRun,
    Webhook(WebhookClient),
    /// No webhook configured; every delivery fails.
    Unconfigured,
}

impl Delivery {
    /// A webhook that cannot be used is logged and treated as unconfigured.
    pub fn from_config(chat: &ChatConfig) -> Self {
        if chat.dry_run {
            return Self::DryRun;
        }
        match chat.webhook_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => match WebhookClient::new(url) {
                Ok(client) => Self::Webhook(client),
                Err(e) => {
                    error!(error = %e, "Invalid webhook, messages cannot be delivered");
                    Self::Unconfigured
                }
            },
            _ => {
                warn!("No webhook URL configured, messages cannot be delivered");
                Self::Unconfigured
            }
        }
    }

    /// Deliver `text` once. Failures are logged and reported as `false`.
    pub async fn deliver(&self, text: &str) -> bool {
        match self {
            Self::DryRun => {
                info!(body = text, "Dry run, not posting");
                true
            }
            Self::Webhook(client) => match client.send(text).await {
                Ok(()) => {
                    info!("Message delivered");
                    true
                }
                Err(e) => {
                    let detail = format!("{e:#}");
                    error!(error = %detail, "Failed to deliver message");
                    false
                }
            },
            Self::Unconfigured => {
                warn!("Dropping message, no webhook URL configured");
                false
            }
        }
    }
}
