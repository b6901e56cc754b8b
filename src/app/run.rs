use anyhow::{Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use super::messages::{MessageKind, build_message};
use super::schedule::Schedule;
use crate::chat::Delivery;
use crate::util::config::AppConfig;

/// Build one message and hand it to `delivery` unless it is empty. Returns
/// `false` only when a non-empty message failed to go out.
pub async fn run_once(
    kind: MessageKind,
    config: &AppConfig,
    token: Option<&str>,
    delivery: &Delivery,
) -> bool {
    let text = build_message(kind, config, token, Utc::now()).await;
    if text.is_empty() {
        info!(kind = %kind, "Nothing to send");
        return true;
    }
    delivery.deliver(&text).await
}

/// Fire configured jobs until interrupted.
pub async fn run_daemon(
    config: &AppConfig,
    token: Option<&str>,
    delivery: &Delivery,
) -> Result<()> {
    let schedule = Schedule::from_config(&config.schedule)?;
    if schedule.is_empty() {
        bail!("No [[schedule.jobs]] configured");
    }

    let mut cursor = Utc::now();
    loop {
        let Some((at, kind)) = schedule.next_run(cursor) else {
            bail!("Schedule has no upcoming runs");
        };
        info!(kind = %kind, at = %at, "Next run scheduled");

        let wait = (at - Utc::now()).to_std().unwrap_or_default();
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                return Ok(());
            }
        }

        if !run_once(kind, config, token, delivery).await {
            warn!(kind = %kind, "Scheduled run failed to deliver");
        }
        cursor = at.max(Utc::now());
    }
}
