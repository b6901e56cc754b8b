use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app::schedule::JobConfig;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default)]
    pub token: Option<String>,
    /// Comma separated `owner/name` list.
    #[serde(default)]
    pub repos: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChatConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_standup_message")]
    pub standup: String,
    #[serde(default = "default_weekly_message")]
    pub weekly: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScheduleConfig {
    /// Offset from UTC, in minutes, that job times are written in.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

/// Values given on the command line or through the environment. They take
/// precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub webhook_url: Option<String>,
    pub repos: Option<String>,
    pub max_age_days: Option<u32>,
    pub dry_run: bool,
}

fn default_api_url() -> String {
    "https://api.github.com/graphql".to_string()
}
fn default_max_age_days() -> u32 {
    120
}
fn default_standup_message() -> String {
    "Good morning team! 🌅 Time for the daily standup. \
     Share what you did yesterday, what you plan today and anything blocking you."
        .to_string()
}
fn default_weekly_message() -> String {
    "Happy Friday! 📝 Please post your weekly report before you log off.".to_string()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            repos: String::new(),
            api_url: default_api_url(),
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            max_age_days: default_max_age_days(),
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            standup: default_standup_message(),
            weekly: default_weekly_message(),
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }

        // Search candidate paths in order
        let mut candidates = Vec::new();

        // 1. ~/.config/standup-bot/config.toml (standard XDG on all platforms)
        if let Some(home) = std::env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join(".config/standup-bot/config.toml"));
        }

        // 2. Platform-specific path from `directories` crate
        if let Some(proj_dirs) = ProjectDirs::from("", "", "standup-bot") {
            candidates.push(proj_dirs.config_dir().join("config.toml"));
        }

        for config_path in &candidates {
            if config_path.exists() {
                return Self::read(config_path);
            }
        }

        Ok(AppConfig::default())
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.webhook_url {
            self.chat.webhook_url = Some(url);
        }
        if let Some(repos) = overrides.repos {
            self.github.repos = repos;
        }
        if let Some(days) = overrides.max_age_days {
            self.reminder.max_age_days = days;
        }
        if overrides.dry_run {
            self.chat.dry_run = true;
        }
    }
}
