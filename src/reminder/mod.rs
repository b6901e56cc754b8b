pub mod compose;
pub mod fetch;
pub mod reviews;

pub use compose::compose;
pub use fetch::{FetchOutcome, PullRequestSource, fetch, fetch_from, parse_repo_list};
pub use reviews::resolve_reviewers;
