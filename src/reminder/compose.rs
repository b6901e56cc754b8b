use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::github::models::{DraftCounts, PullRequest};
use crate::util::time::{plural, relative_age, short_date};

#[derive(Debug, Default, Clone, Copy)]
struct HiddenCounts {
    fully_reviewed: usize,
    too_old: usize,
    drafts: usize,
}

impl HiddenCounts {
    fn is_empty(&self) -> bool {
        self.fully_reviewed == 0 && self.too_old == 0 && self.drafts == 0
    }
}

/// Render the PR reminder for `prs` as of `now`.
///
/// Returns an empty string when there is nothing to post: either no PRs at
/// all, or none left visible after the age and review filters. The "Hidden
/// PRs" block is only emitted alongside at least one visible PR.
pub fn compose(
    prs: &[PullRequest],
    max_age_days: u32,
    draft_counts: &DraftCounts,
    now: DateTime<Utc>,
) -> String {
    if prs.is_empty() {
        return String::new();
    }

    let max_age = Duration::days(i64::from(max_age_days));

    let mut repo_order: Vec<&str> = Vec::new();
    let mut visible: HashMap<&str, Vec<&PullRequest>> = HashMap::new();
    let mut hidden: HashMap<&str, HiddenCounts> = HashMap::new();

    for pr in prs {
        let repo = pr.repository.as_str();
        if !repo_order.contains(&repo) {
            repo_order.push(repo);
        }

        if now.signed_duration_since(pr.created_at) > max_age {
            hidden.entry(repo).or_default().too_old += 1;
        } else if !pr.needs_attention() {
            hidden.entry(repo).or_default().fully_reviewed += 1;
        } else {
            visible.entry(repo).or_default().push(pr);
        }
    }

    if visible.is_empty() {
        return String::new();
    }

    let mut lines = vec!["*PRs that need your attention:*".to_string()];

    for repo in &repo_order {
        let Some(repo_prs) = visible.get(repo) else {
            continue;
        };
        lines.push(String::new());
        lines.push(format!("*{repo}*"));
        for pr in repo_prs {
            render_pr(&mut lines, pr, &now);
        }
    }

    let summary = hidden_summary(&repo_order, hidden, draft_counts, max_age_days);
    if !summary.is_empty() {
        lines.push(String::new());
        lines.push("*Hidden PRs:*".to_string());
        lines.extend(summary);
    }

    lines.join("\n")
}

fn render_pr(lines: &mut Vec<String>, pr: &PullRequest, now: &DateTime<Utc>) {
    let reviewers = pr
        .reviewers
        .iter()
        .map(|r| format!("{} {}", r.login, r.status.glyph()))
        .collect::<Vec<_>>()
        .join(", ");

    lines.push(format!("• #{} - <{}|{}>", pr.number, pr.url, pr.title));
    lines.push(format!("    Author: {}", pr.author));
    lines.push(format!("    Reviewers: {reviewers}"));
    lines.push(format!(
        "    Created: {} ({})",
        short_date(&pr.created_at),
        relative_age(&pr.created_at, now)
    ));
}

/// One line per repository with something hidden. Repositories keep their
/// order of appearance; draft-only repositories follow in name order.
fn hidden_summary<'a>(
    repo_order: &[&'a str],
    mut hidden: HashMap<&'a str, HiddenCounts>,
    draft_counts: &'a DraftCounts,
    max_age_days: u32,
) -> Vec<String> {
    let mut order: Vec<&'a str> = repo_order.to_vec();
    for (repo, &drafts) in draft_counts {
        if drafts == 0 {
            continue;
        }
        let repo = repo.as_str();
        hidden.entry(repo).or_default().drafts = drafts;
        if !order.contains(&repo) {
            order.push(repo);
        }
    }

    order
        .into_iter()
        .filter_map(|repo| {
            let counts = hidden.get(repo).copied().unwrap_or_default();
            if counts.is_empty() {
                return None;
            }

            let mut parts = Vec::new();
            if counts.fully_reviewed > 0 {
                parts.push(format!(
                    "{} fully reviewed",
                    plural(counts.fully_reviewed as i64, "PR")
                ));
            }
            if counts.too_old > 0 {
                parts.push(format!(
                    "{} older than {}",
                    plural(counts.too_old as i64, "PR"),
                    plural(i64::from(max_age_days), "day")
                ));
            }
            if counts.drafts > 0 {
                parts.push(plural(counts.drafts as i64, "draft PR"));
            }
            Some(format!("• {repo}: {}", parts.join(", ")))
        })
        .collect()
}
