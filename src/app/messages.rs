use std::fmt;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::reminder::{compose, fetch};
use crate::util::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    /// Daily standup prompt
    Standup,
    /// Weekly report prompt
    Weekly,
    /// Open pull requests still waiting on reviewers
    PrReminder,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Standup => "standup",
            Self::Weekly => "weekly",
            Self::PrReminder => "pr-reminder",
        };
        f.write_str(name)
    }
}

/// Build the text for `kind`. An empty string means there is nothing to post.
pub async fn build_message(
    kind: MessageKind,
    config: &AppConfig,
    token: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    match kind {
        MessageKind::Standup => config.messages.standup.clone(),
        MessageKind::Weekly => config.messages.weekly.clone(),
        MessageKind::PrReminder => {
            let outcome = fetch(token, &config.github.api_url, &config.github.repos).await;
            debug!(
                prs = outcome.prs.len(),
                repos_with_drafts = outcome.draft_counts.len(),
                "PR fetch complete"
            );
            compose(
                &outcome.prs,
                config.reminder.max_age_days,
                &outcome.draft_counts,
                now,
            )
        }
    }
}
