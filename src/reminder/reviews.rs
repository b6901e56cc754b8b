use crate::github::models::{BOT_MARKER, ReviewEvent, ReviewState, ReviewStatus, Reviewer};

/// Reduce requested reviewers and the review history of a PR into one status
/// per reviewer.
///
/// Requested reviewers come first, in request order, starting at `Pending`.
/// Accounts that only reviewed follow in order of their first qualifying
/// review. Reviews by the PR author or by bots are skipped. Approvals and
/// change requests always overwrite; a comment only replaces `Pending`.
pub fn resolve_reviewers(
    pr_author: &str,
    requested: &[String],
    events: &[ReviewEvent],
) -> Vec<Reviewer> {
    let mut reviewers: Vec<Reviewer> = Vec::with_capacity(requested.len());

    for login in requested {
        if !reviewers.iter().any(|r| r.login == *login) {
            reviewers.push(Reviewer::new(login.clone(), ReviewStatus::Pending));
        }
    }

    events
        .iter()
        .filter(|e| e.author != pr_author && !is_bot(&e.author))
        .fold(reviewers, apply_event)
}

fn apply_event(mut reviewers: Vec<Reviewer>, event: &ReviewEvent) -> Vec<Reviewer> {
    let incoming = match event.state {
        ReviewState::Approved => ReviewStatus::Approved,
        ReviewState::ChangesRequested => ReviewStatus::ChangesRequested,
        ReviewState::Commented => ReviewStatus::Commented,
        ReviewState::Dismissed | ReviewState::Pending | ReviewState::Unknown => return reviewers,
    };

    match reviewers.iter_mut().find(|r| r.login == event.author) {
        Some(existing) => {
            if incoming != ReviewStatus::Commented || existing.status == ReviewStatus::Pending {
                existing.status = incoming;
            }
        }
        None => reviewers.push(Reviewer::new(event.author.clone(), incoming)),
    }
    reviewers
}

pub fn is_bot(login: &str) -> bool {
    login.contains(BOT_MARKER)
}
