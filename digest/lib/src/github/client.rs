//! GraphQL client for the GitHub API.
//!
//! Every operation is a single POST to the GraphQL endpoint with bearer
//! authentication. Rate limiting is reported, never waited out.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::queries::{
    self, CategoriesField, CreateDiscussionData, GitHubErrorBody, GraphQlResponse,
    PullRequestsField, RepositoryData, SearchData,
};
use super::{
    CATEGORY_PAGE_SIZE, GitHubApi, PULL_REQUEST_PAGE_SIZE, PullRequestPage, RepositoryCategories,
};
use crate::config::RepoRef;
use crate::error::DigestError;

/// Public GitHub GraphQL endpoint.
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

const USER_AGENT: &str = "digest-lib";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated GitHub GraphQL client.
///
/// ## Examples
///
/// ```rust,no_run
/// use digest_lib::{GitHubApi, GitHubClient, RepoRef};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GitHubClient::new(std::env::var("GITHUB_TOKEN")?)?;
/// let page = client
///     .merged_pull_requests(&RepoRef::new("tokio-rs", "tokio"), None)
///     .await?;
/// println!("{} merged pull requests", page.nodes.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl GitHubClient {
    /// Creates a client for the public GitHub endpoint.
    ///
    /// ## Errors
    ///
    /// Returns `DigestError::MissingToken` if `token` is blank.
    pub fn new(token: impl Into<String>) -> Result<Self, DigestError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DigestError::MissingToken);
        }

        Ok(Self {
            http: Client::new(),
            endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            token,
        })
    }

    /// Points the client at another GraphQL endpoint (GitHub Enterprise, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Reuses an existing HTTP client.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one GraphQL document and decodes its `data` member.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &str,
        variables: Value,
    ) -> Result<T, DigestError> {
        debug!(operation, endpoint = %self.endpoint, "Sending GraphQL request");

        let response = self
            .http
            .post(&self.endpoint)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .header("Authorization", format!("bearer {}", self.token))
            .timeout(REQUEST_TIMEOUT)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(DigestError::RateLimitExceeded);
        }

        if !status.is_success() {
            if status.as_u16() == 403
                && let Some(remaining) = response.headers().get("X-RateLimit-Remaining")
                && let Ok(remaining_str) = remaining.to_str()
                && let Ok(remaining_count) = remaining_str.parse::<u32>()
                && remaining_count == 0
            {
                return Err(DigestError::RateLimitExceeded);
            }

            let error_text = response.text().await?;
            let message = match serde_json::from_str::<GitHubErrorBody>(&error_text) {
                Ok(gh_error) => gh_error.message,
                Err(_) => error_text,
            };
            return Err(DigestError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let envelope: GraphQlResponse<T> = serde_json::from_str(&body)?;

        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(DigestError::GraphQl(messages.join("; ")));
        }

        envelope.data.ok_or(DigestError::MissingData("data"))
    }
}

impl GitHubApi for GitHubClient {
    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn merged_pull_requests(
        &self,
        repo: &RepoRef,
        after: Option<&str>,
    ) -> Result<PullRequestPage, DigestError> {
        let data: RepositoryData<PullRequestsField> = self
            .execute(
                "merged_pull_requests",
                queries::MERGED_PULL_REQUESTS,
                json!({
                    "owner": repo.owner,
                    "repo": repo.name,
                    "first": PULL_REQUEST_PAGE_SIZE,
                    "after": after,
                }),
            )
            .await?;

        let connection = data
            .repository
            .ok_or(DigestError::MissingData("repository"))?
            .pull_requests;

        debug!(
            count = connection.nodes.len(),
            has_next_page = connection.page_info.has_next_page,
            "Fetched merged pull request page"
        );

        Ok(PullRequestPage {
            nodes: connection.nodes,
            has_next_page: connection.page_info.has_next_page,
            end_cursor: connection.page_info.end_cursor,
        })
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn merged_pull_request_count(
        &self,
        repo: &RepoRef,
        author: &str,
    ) -> Result<u64, DigestError> {
        let data: SearchData = self
            .execute(
                "merged_pull_request_count",
                queries::MERGED_PULL_REQUEST_COUNT,
                json!({
                    "search": queries::merged_by_author_search(&repo.owner, &repo.name, author),
                }),
            )
            .await?;

        Ok(data.search.issue_count)
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn discussion_categories(
        &self,
        repo: &RepoRef,
    ) -> Result<RepositoryCategories, DigestError> {
        let data: RepositoryData<CategoriesField> = self
            .execute(
                "discussion_categories",
                queries::DISCUSSION_CATEGORIES,
                json!({
                    "owner": repo.owner,
                    "repo": repo.name,
                    "first": CATEGORY_PAGE_SIZE,
                }),
            )
            .await?;

        let repository = data
            .repository
            .ok_or(DigestError::MissingData("repository"))?;

        Ok(RepositoryCategories {
            repository_id: repository.id,
            categories: repository.discussion_categories.nodes,
        })
    }

    #[instrument(skip(self, body), fields(body_len = body.len()))]
    async fn create_discussion(
        &self,
        repository_id: &str,
        category_id: &str,
        title: &str,
        body: &str,
    ) -> Result<String, DigestError> {
        let data: CreateDiscussionData = self
            .execute(
                "create_discussion",
                queries::CREATE_DISCUSSION,
                json!({
                    "repositoryId": repository_id,
                    "categoryId": category_id,
                    "title": title,
                    "body": body,
                }),
            )
            .await?;

        data.create_discussion
            .and_then(|payload| payload.discussion)
            .map(|discussion| discussion.url)
            .ok_or(DigestError::MissingData("createDiscussion.discussion"))
    }
}
