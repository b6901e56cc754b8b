use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Marker GitHub appends to automated account logins.
pub const BOT_MARKER: &str = "[bot]";

/// A repository identified as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoSpecError {
    #[error("repository `{0}` is not in owner/name form")]
    MissingSlash(String),
    #[error("repository `{0}` is missing its owner")]
    MissingOwner(String),
    #[error("repository `{0}` is missing its name")]
    MissingName(String),
    #[error("repository `{0}` has more than one `/`")]
    TooManySegments(String),
}

impl RepoSpec {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSpec {
    type Err = RepoSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((owner, name)) = s.split_once('/') else {
            return Err(RepoSpecError::MissingSlash(s.to_string()));
        };
        let (owner, name) = (owner.trim(), name.trim());
        if name.contains('/') {
            return Err(RepoSpecError::TooManySegments(s.to_string()));
        }
        if owner.is_empty() {
            return Err(RepoSpecError::MissingOwner(s.to_string()));
        }
        if name.is_empty() {
            return Err(RepoSpecError::MissingName(s.to_string()));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// State carried by a single submitted review, as reported by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEvent {
    pub author: String,
    pub state: ReviewState,
}

impl ReviewEvent {
    pub fn new(author: impl Into<String>, state: ReviewState) -> Self {
        Self {
            author: author.into(),
            state,
        }
    }
}

/// An open pull request exactly as the host returned it, before reviewer
/// reconciliation.
#[derive(Debug, Clone)]
pub struct OpenPullRequest {
    pub number: u32,
    pub title: String,
    pub author: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub is_draft: bool,
    pub requested_reviewers: Vec<String>,
    /// Oldest first.
    pub reviews: Vec<ReviewEvent>,
}

/// Resolved status of one reviewer on a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Pending,
    Approved,
    ChangesRequested,
    Commented,
}

impl ReviewStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Approved => "✅",
            Self::ChangesRequested => "🔄",
            Self::Commented => "💬",
            Self::Pending => "⏳",
        }
    }

    /// Whether a reviewer in this state still owes the PR some attention.
    pub fn needs_attention(self) -> bool {
        !matches!(self, Self::Approved)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reviewer {
    pub login: String,
    pub status: ReviewStatus,
}

impl Reviewer {
    pub fn new(login: impl Into<String>, status: ReviewStatus) -> Self {
        Self {
            login: login.into(),
            status,
        }
    }
}

/// An open, non-draft pull request with at least one resolved reviewer.
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub number: u32,
    pub title: String,
    pub author: String,
    pub url: String,
    pub reviewers: Vec<Reviewer>,
    pub created_at: DateTime<Utc>,
    pub repository: String,
}

impl PullRequest {
    pub fn needs_attention(&self) -> bool {
        self.reviewers.iter().any(|r| r.status.needs_attention())
    }
}

/// Open draft PRs per repository (`owner/name`).
pub type DraftCounts = BTreeMap<String, usize>;

#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub remaining: u32,
    pub limit: u32,
    pub reset_at: Option<DateTime<Utc>>,
}
