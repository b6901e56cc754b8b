use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::models::*;
use super::queries;

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    token: String,
}

impl GithubClient {
    pub fn new(token: &str, api_url: &str) -> Result<Self> {
        if !api_url.starts_with("https://") {
            bail!("GitHub API URL must use HTTPS: {}", api_url);
        }

        let client = Client::builder()
            .user_agent("standup-bot")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            token: token.to_string(),
        })
    }

    async fn query(&self, query: &str, variables: Value) -> Result<Value> {
        let body = json!({
            "query": query,
            "variables": variables,
        });

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("GitHub API request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("GitHub API returned {}: {}", status, text);
        }

        let data: Value = resp
            .json()
            .await
            .context("Failed to parse GitHub response")?;

        if let Some(errors) = data.get("errors") {
            let error_msg = errors
                .as_array()
                .and_then(|arr| arr.first())
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown GraphQL error");
            bail!("GraphQL error: {}", error_msg);
        }

        Ok(data)
    }

    fn extract_rate_limit(data: &Value) -> RateLimit {
        let rl = &data["data"]["rateLimit"];
        RateLimit {
            remaining: rl["remaining"].as_u64().unwrap_or(0) as u32,
            limit: rl["limit"].as_u64().unwrap_or(0) as u32,
            reset_at: rl["resetAt"].as_str().and_then(|s| s.parse().ok()),
        }
    }

    /// Open pull requests of one repository, newest first, capped at 100.
    pub async fn fetch_open_prs(
        &self,
        repo: &RepoSpec,
    ) -> Result<(Vec<OpenPullRequest>, RateLimit)> {
        let variables = json!({
            "owner": repo.owner,
            "name": repo.name,
        });

        let data = self
            .query(queries::REPO_OPEN_PRS_QUERY, variables)
            .await?;
        let rate_limit = Self::extract_rate_limit(&data);
        let prs = parse_repo_prs(&data)?;

        debug!(
            repo = %repo,
            count = prs.len(),
            remaining = rate_limit.remaining,
            "Fetched open PRs"
        );
        Ok((prs, rate_limit))
    }
}

/// Extract the open pull requests from a `REPO_OPEN_PRS_QUERY` response.
pub fn parse_repo_prs(data: &Value) -> Result<Vec<OpenPullRequest>> {
    let repository = &data["data"]["repository"];
    if repository.is_null() {
        bail!("Repository not found in GitHub response");
    }

    let nodes = repository["pullRequests"]["nodes"]
        .as_array()
        .context("Missing pull request nodes")?;

    nodes.iter().map(parse_open_pr).collect()
}

fn parse_open_pr(node: &Value) -> Result<OpenPullRequest> {
    let number = node["number"]
        .as_u64()
        .context("Pull request without a number")? as u32;
    let created_at = node["createdAt"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .with_context(|| format!("Pull request #{number} has no valid createdAt"))?;

    let requested_reviewers = node["reviewRequests"]["nodes"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|n| requested_reviewer_login(&n["requestedReviewer"]))
                .collect()
        })
        .unwrap_or_default();

    let reviews = node["reviews"]["nodes"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|r| {
                    let author = actor_login(&r["author"])?;
                    let state = serde_json::from_value(r["state"].clone())
                        .unwrap_or(ReviewState::Unknown);
                    Some(ReviewEvent { author, state })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(OpenPullRequest {
        number,
        title: node["title"].as_str().unwrap_or("").to_string(),
        author: actor_login(&node["author"]).unwrap_or_else(|| "ghost".to_string()),
        url: node["url"].as_str().unwrap_or("").to_string(),
        created_at,
        is_draft: node["isDraft"].as_bool().unwrap_or(false),
        requested_reviewers,
        reviews,
    })
}

/// Login of a GraphQL `Actor`. GraphQL drops the `[bot]` suffix REST uses,
/// so it is put back for `Bot` actors.
fn actor_login(actor: &Value) -> Option<String> {
    let login = actor["login"].as_str()?;
    if actor["__typename"].as_str() == Some("Bot") && !login.contains(BOT_MARKER) {
        return Some(format!("{login}{BOT_MARKER}"));
    }
    Some(login.to_string())
}

fn requested_reviewer_login(reviewer: &Value) -> Option<String> {
    match reviewer["__typename"].as_str() {
        Some("Team") => reviewer["slug"].as_str().map(|s| s.to_string()),
        _ => actor_login(reviewer),
    }
}
