use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::reviews::resolve_reviewers;
use crate::github::GithubClient;
use crate::github::models::{DraftCounts, OpenPullRequest, PullRequest, RepoSpec};

/// Anything that can list the open pull requests of a repository.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    async fn open_pull_requests(&self, repo: &RepoSpec) -> Result<Vec<OpenPullRequest>>;
}

#[async_trait]
impl PullRequestSource for GithubClient {
    async fn open_pull_requests(&self, repo: &RepoSpec) -> Result<Vec<OpenPullRequest>> {
        let (prs, rate_limit) = self.fetch_open_prs(repo).await?;
        if rate_limit.limit > 0 && rate_limit.remaining < rate_limit.limit / 10 {
            warn!(
                remaining = rate_limit.remaining,
                limit = rate_limit.limit,
                reset_at = ?rate_limit.reset_at,
                "GitHub rate limit running low"
            );
        }
        Ok(prs)
    }
}

#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub prs: Vec<PullRequest>,
    pub draft_counts: DraftCounts,
}

/// Parse a comma separated `owner/name` list, skipping malformed entries.
/// Repeated repositories are kept once, at their first position.
pub fn parse_repo_list(csv: &str) -> Vec<RepoSpec> {
    let mut repos: Vec<RepoSpec> = Vec::new();

    for entry in csv.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match entry.parse::<RepoSpec>() {
            Ok(repo) if repos.contains(&repo) => {
                debug!(repo = %repo, "Ignoring repeated repository");
            }
            Ok(repo) => repos.push(repo),
            Err(e) => warn!(entry = entry, error = %e, "Skipping invalid repository"),
        }
    }

    repos
}

/// Fetch reviewable PRs for every repository in `repos_csv` from GitHub.
///
/// Without a token nothing is queried and the outcome is empty.
pub async fn fetch(token: Option<&str>, api_url: &str, repos_csv: &str) -> FetchOutcome {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        warn!("No GitHub token configured, skipping PR fetch");
        return FetchOutcome::default();
    };

    let client = match GithubClient::new(token, api_url) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Could not build GitHub client");
            return FetchOutcome::default();
        }
    };

    fetch_from(&client, repos_csv).await
}

/// Walk the repositories one at a time. A failing repository is logged and
/// contributes nothing.
pub async fn fetch_from<S>(source: &S, repos_csv: &str) -> FetchOutcome
where
    S: PullRequestSource + ?Sized,
{
    let repos = parse_repo_list(repos_csv);
    if repos.is_empty() {
        warn!("No repositories configured, skipping PR fetch");
        return FetchOutcome::default();
    }

    let mut outcome = FetchOutcome::default();

    for repo in &repos {
        let open = match source.open_pull_requests(repo).await {
            Ok(prs) => prs,
            Err(e) => {
                let detail = format!("{e:#}");
                error!(repo = %repo, error = %detail, "Failed to fetch pull requests");
                continue;
            }
        };

        let full_name = repo.full_name();
        let (drafts, ready): (Vec<_>, Vec<_>) = open.into_iter().partition(|pr| pr.is_draft);
        outcome.draft_counts.insert(full_name.clone(), drafts.len());

        let before = outcome.prs.len();
        for pr in ready {
            let reviewers = resolve_reviewers(&pr.author, &pr.requested_reviewers, &pr.reviews);
            if reviewers.is_empty() {
                debug!(repo = %repo, number = pr.number, "No reviewers, skipping");
                continue;
            }
            outcome.prs.push(PullRequest {
                number: pr.number,
                title: pr.title,
                author: pr.author,
                url: pr.url,
                reviewers,
                created_at: pr.created_at,
                repository: full_name.clone(),
            });
        }

        info!(
            repo = %repo,
            prs = outcome.prs.len() - before,
            drafts = drafts.len(),
            "Repository processed"
        );
    }

    outcome
}
