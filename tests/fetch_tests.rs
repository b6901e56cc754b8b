use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use standup_bot::github::models::{
    OpenPullRequest, RepoSpec, ReviewEvent, ReviewState, ReviewStatus,
};
use standup_bot::reminder::{PullRequestSource, fetch, fetch_from, parse_repo_list};

#[derive(Default)]
struct FakeSource {
    repos: HashMap<String, Vec<OpenPullRequest>>,
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    fn with_repo(mut self, repo: &str, prs: Vec<OpenPullRequest>) -> Self {
        self.repos.insert(repo.into(), prs);
        self
    }

    fn with_failure(mut self, repo: &str) -> Self {
        self.failing.push(repo.into());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PullRequestSource for FakeSource {
    async fn open_pull_requests(&self, repo: &RepoSpec) -> Result<Vec<OpenPullRequest>> {
        let name = repo.full_name();
        self.calls.lock().unwrap().push(name.clone());
        if self.failing.contains(&name) {
            return Err(anyhow!("GitHub API returned 502 Bad Gateway"));
        }
        Ok(self.repos.get(&name).cloned().unwrap_or_default())
    }
}

fn make_pr(number: u32, requested: &[&str], reviews: Vec<ReviewEvent>) -> OpenPullRequest {
    OpenPullRequest {
        number,
        title: format!("PR {number}"),
        author: "alice".into(),
        url: format!("https://github.com/org/repo/pull/{number}"),
        created_at: Utc::now() - Duration::days(1),
        is_draft: false,
        requested_reviewers: requested.iter().map(|s| s.to_string()).collect(),
        reviews,
    }
}

fn make_draft(number: u32) -> OpenPullRequest {
    OpenPullRequest {
        is_draft: true,
        ..make_pr(number, &["bob"], vec![])
    }
}

// --- Repository list parsing ---

#[test]
fn test_parse_repo_list_trims_and_drops_empty() {
    let repos = parse_repo_list(" org/one , ,org/two,");
    let names: Vec<String> = repos.iter().map(|r| r.full_name()).collect();
    assert_eq!(names, vec!["org/one", "org/two"]);
}

#[test]
fn test_parse_repo_list_skips_malformed() {
    let repos = parse_repo_list("noslash,/name,owner/,a/b/c,good/repo");
    let names: Vec<String> = repos.iter().map(|r| r.full_name()).collect();
    assert_eq!(names, vec!["good/repo"]);
}

#[test]
fn test_parse_repo_list_drops_repeats() {
    let repos = parse_repo_list("org/a, org/b, org/a ,org/b");
    let names: Vec<String> = repos.iter().map(|r| r.full_name()).collect();
    assert_eq!(names, vec!["org/a", "org/b"]);
}

#[test]
fn test_repo_spec_errors() {
    use standup_bot::github::models::RepoSpecError;

    assert!(matches!(
        "noslash".parse::<RepoSpec>(),
        Err(RepoSpecError::MissingSlash(_))
    ));
    assert!(matches!(
        "/name".parse::<RepoSpec>(),
        Err(RepoSpecError::MissingOwner(_))
    ));
    assert!(matches!(
        "owner/".parse::<RepoSpec>(),
        Err(RepoSpecError::MissingName(_))
    ));
    assert!(matches!(
        "a/b/c".parse::<RepoSpec>(),
        Err(RepoSpecError::TooManySegments(_))
    ));
}

// --- Fetch pipeline ---

#[tokio::test]
async fn test_fetch_without_token_is_empty() {
    let outcome = fetch(None, "https://api.github.com/graphql", "org/repo").await;
    assert!(outcome.prs.is_empty());
    assert!(outcome.draft_counts.is_empty());

    let outcome = fetch(Some("  "), "https://api.github.com/graphql", "org/repo").await;
    assert!(outcome.prs.is_empty());
}

#[tokio::test]
async fn test_fetch_with_invalid_api_url_is_empty() {
    let outcome = fetch(Some("token"), "http://insecure.example.com", "org/repo").await;
    assert!(outcome.prs.is_empty());
    assert!(outcome.draft_counts.is_empty());
}

#[tokio::test]
async fn test_fetch_without_repos_makes_no_calls() {
    let source = FakeSource::default();
    let outcome = fetch_from(&source, " , ").await;
    assert!(outcome.prs.is_empty());
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn test_drafts_are_counted_not_returned() {
    let source = FakeSource::default().with_repo(
        "org/repo",
        vec![make_draft(3), make_pr(2, &["bob"], vec![]), make_draft(1)],
    );

    let outcome = fetch_from(&source, "org/repo").await;

    assert_eq!(outcome.prs.len(), 1);
    assert_eq!(outcome.prs[0].number, 2);
    assert_eq!(outcome.draft_counts.get("org/repo"), Some(&2));
}

#[tokio::test]
async fn test_repo_without_drafts_records_zero() {
    let source = FakeSource::default().with_repo("org/repo", vec![make_pr(1, &["bob"], vec![])]);
    let outcome = fetch_from(&source, "org/repo").await;
    assert_eq!(outcome.draft_counts.get("org/repo"), Some(&0));
}

#[tokio::test]
async fn test_prs_without_reviewers_are_dropped() {
    let source = FakeSource::default().with_repo(
        "org/repo",
        vec![
            make_pr(1, &[], vec![]),
            make_pr(
                2,
                &[],
                vec![ReviewEvent::new("alice", ReviewState::Commented)],
            ),
            make_pr(3, &[], vec![ReviewEvent::new("bob", ReviewState::Commented)]),
        ],
    );

    let outcome = fetch_from(&source, "org/repo").await;

    let numbers: Vec<u32> = outcome.prs.iter().map(|p| p.number).collect();
    assert_eq!(numbers, vec![3]);
    assert_eq!(outcome.prs[0].reviewers[0].status, ReviewStatus::Commented);
}

#[tokio::test]
async fn test_failing_repo_does_not_abort_batch() {
    let source = FakeSource::default()
        .with_failure("org/broken")
        .with_repo("org/good", vec![make_pr(7, &["bob"], vec![])]);

    let outcome = fetch_from(&source, "org/broken,org/good").await;

    assert_eq!(source.calls(), vec!["org/broken", "org/good"]);
    assert_eq!(outcome.prs.len(), 1);
    assert_eq!(outcome.prs[0].repository, "org/good");
    assert!(!outcome.draft_counts.contains_key("org/broken"));
    assert_eq!(outcome.draft_counts.get("org/good"), Some(&0));
}

#[tokio::test]
async fn test_repeated_repo_is_fetched_once() {
    let source = FakeSource::default().with_repo("org/repo", vec![make_pr(1, &["bob"], vec![])]);

    let outcome = fetch_from(&source, "org/repo,org/repo").await;

    assert_eq!(source.calls(), vec!["org/repo"]);
    assert_eq!(outcome.prs.len(), 1);
}

#[tokio::test]
async fn test_order_follows_csv_then_query_order() {
    let source = FakeSource::default()
        .with_repo(
            "org/a",
            vec![make_pr(9, &["bob"], vec![]), make_pr(4, &["bob"], vec![])],
        )
        .with_repo("org/b", vec![make_pr(5, &["carol"], vec![])]);

    let outcome = fetch_from(&source, "org/b, bad, org/a").await;

    let seen: Vec<(String, u32)> = outcome
        .prs
        .iter()
        .map(|p| (p.repository.clone(), p.number))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("org/b".to_string(), 5),
            ("org/a".to_string(), 9),
            ("org/a".to_string(), 4),
        ]
    );
    assert_eq!(source.calls(), vec!["org/b", "org/a"]);
}

#[tokio::test]
async fn test_reviewer_states_are_resolved() {
    let source = FakeSource::default().with_repo(
        "org/repo",
        vec![make_pr(
            1,
            &["bob", "carol"],
            vec![
                ReviewEvent::new("bob", ReviewState::ChangesRequested),
                ReviewEvent::new("renovate[bot]", ReviewState::Approved),
                ReviewEvent::new("bob", ReviewState::Approved),
            ],
        )],
    );

    let outcome = fetch_from(&source, "org/repo").await;

    let statuses: Vec<(&str, ReviewStatus)> = outcome.prs[0]
        .reviewers
        .iter()
        .map(|r| (r.login.as_str(), r.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("bob", ReviewStatus::Approved),
            ("carol", ReviewStatus::Pending)
        ]
    );
}
