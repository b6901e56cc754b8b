pub const REPO_OPEN_PRS_QUERY: &str = r#"
query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    pullRequests(first: 100, states: OPEN, orderBy: {field: CREATED_AT, direction: DESC}) {
      nodes {
        number
        title
        url
        createdAt
        isDraft
        author {
          __typename
          login
        }
        reviewRequests(first: 100) {
          nodes {
            requestedReviewer {
              __typename
              ... on User { login }
              ... on Bot { login }
              ... on Mannequin { login }
              ... on Team { slug }
            }
          }
        }
        reviews(first: 100) {
          nodes {
            state
            author {
              __typename
              login
            }
          }
        }
      }
    }
  }
  rateLimit {
    remaining
    limit
    resetAt
  }
}
"#;
