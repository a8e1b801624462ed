//! GitHub access used by the digest pipeline.
//!
//! The pipeline only talks to GitHub through the [`GitHubApi`] trait, which
//! names the four remote operations a digest needs. [`GitHubClient`] is the
//! production implementation over the GraphQL endpoint; tests substitute
//! an in-memory implementation returning fixtures.
//!
//! ## Module Structure
//!
//! - [`client`]: reqwest-based GraphQL client
//! - [`queries`]: GraphQL documents and response envelopes

pub mod client;
pub mod queries;

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::RepoRef;
use crate::error::DigestError;

pub use client::GitHubClient;

/// Merged pull requests requested per page.
pub const PULL_REQUEST_PAGE_SIZE: usize = 100;

/// Discussion categories requested from the repository.
pub const CATEGORY_PAGE_SIZE: usize = 25;

/// Account that opened a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Actor {
    pub login: String,
    pub url: String,
}

/// A merged pull request as returned by the remote.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestNode {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// `None` when the author account has been deleted
    pub author: Option<Actor>,
}

/// One page of merged pull requests, most recently updated first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestPage {
    pub nodes: Vec<PullRequestNode>,
    pub has_next_page: bool,
    /// Cursor to pass as `after` for the next page
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscussionCategory {
    pub id: String,
    pub name: String,
}

/// Repository node ID together with its discussion categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCategories {
    pub repository_id: String,
    pub categories: Vec<DiscussionCategory>,
}

/// Remote operations needed to build and publish a digest.
///
/// Implementations own transport concerns (authentication, timeouts,
/// rate limiting). Every method is a single round trip.
pub trait GitHubApi: Send + Sync {
    /// Fetches one page of merged pull requests ordered by most recent update.
    ///
    /// `after` is the cursor from a previous page, or `None` for the first.
    fn merged_pull_requests(
        &self,
        repo: &RepoRef,
        after: Option<&str>,
    ) -> impl Future<Output = Result<PullRequestPage, DigestError>> + Send;

    /// Returns how many pull requests by `author` have ever been merged in `repo`.
    fn merged_pull_request_count(
        &self,
        repo: &RepoRef,
        author: &str,
    ) -> impl Future<Output = Result<u64, DigestError>> + Send;

    /// Resolves the repository node ID and its discussion categories.
    fn discussion_categories(
        &self,
        repo: &RepoRef,
    ) -> impl Future<Output = Result<RepositoryCategories, DigestError>> + Send;

    /// Creates a discussion and returns its URL.
    fn create_discussion(
        &self,
        repository_id: &str,
        category_id: &str,
        title: &str,
        body: &str,
    ) -> impl Future<Output = Result<String, DigestError>> + Send;
}
