//! GraphQL documents and the response shapes they decode into.

use serde::Deserialize;

use super::{DiscussionCategory, PullRequestNode};

/// Merged pull requests, most recently updated first.
pub const MERGED_PULL_REQUESTS: &str = r#"
query($owner: String!, $repo: String!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $repo) {
    pullRequests(
      first: $first
      after: $after
      states: MERGED
      orderBy: { field: UPDATED_AT, direction: DESC }
    ) {
      nodes {
        number
        title
        url
        mergedAt
        updatedAt
        author {
          login
          url
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

/// Lifetime merged pull request count for one author.
///
/// `repository.pullRequests` cannot filter by author, so this goes through
/// issue search and reads only the count.
pub const MERGED_PULL_REQUEST_COUNT: &str = r#"
query($search: String!) {
  search(query: $search, type: ISSUE, first: 0) {
    issueCount
  }
}
"#;

pub const DISCUSSION_CATEGORIES: &str = r#"
query($owner: String!, $repo: String!, $first: Int!) {
  repository(owner: $owner, name: $repo) {
    id
    discussionCategories(first: $first) {
      nodes {
        id
        name
      }
    }
  }
}
"#;

pub const CREATE_DISCUSSION: &str = r#"
mutation($repositoryId: ID!, $categoryId: ID!, $title: String!, $body: String!) {
  createDiscussion(input: {
    repositoryId: $repositoryId
    categoryId: $categoryId
    title: $title
    body: $body
  }) {
    discussion {
      url
    }
  }
}
"#;

/// Search string selecting merged pull requests by `author` in `owner/name`.
pub fn merged_by_author_search(owner: &str, name: &str, author: &str) -> String {
    format!("repo:{}/{} is:pr is:merged author:{}", owner, name, author)
}

/// Top-level GraphQL envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlErrorMessage {
    pub message: String,
}

/// REST-style error body GitHub sends with non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct GitHubErrorBody {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryData<T> {
    pub repository: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PullRequestsField {
    pub pull_requests: PullRequestConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PullRequestConnection {
    pub nodes: Vec<PullRequestNode>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchData {
    pub search: SearchCount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchCount {
    pub issue_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoriesField {
    pub id: String,
    pub discussion_categories: CategoryConnection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryConnection {
    pub nodes: Vec<DiscussionCategory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateDiscussionData {
    pub create_discussion: Option<CreateDiscussionPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateDiscussionPayload {
    pub discussion: Option<DiscussionUrl>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DiscussionUrl {
    pub url: String,
}
