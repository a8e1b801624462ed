//! Community activity digests for GitHub repositories.
//!
//! A digest run looks back over a window of days, collects the pull requests
//! merged in that window, works out which authors landed their first ever
//! pull request, renders a markdown summary, and posts it as a GitHub
//! Discussion when there was enough activity.
//!
//! ## Pipeline
//!
//! 1. [`ReportWindow`] - the `[start, end]` period, anchored at "now"
//! 2. [`fetch_merged_changes`] - merged pull requests inside the window
//! 3. [`find_new_contributors`] - authors with exactly one merged pull request
//! 4. [`render_digest`] / [`generate_title`] / [`calculate_activity_count`]
//! 5. [`decide`] / [`publish_discussion`] - threshold, dry run, and posting
//!
//! [`run_digest`] runs all of it and returns a [`DigestResult`].
//!
//! ## Remote Access
//!
//! Every stage talks to GitHub through the [`GitHubApi`] trait.
//! [`GitHubClient`] implements it over the GraphQL API; tests use in-memory
//! implementations.

pub mod classify;
pub mod config;
pub mod error;
pub mod fetch;
pub mod github;
pub mod pipeline;
pub mod publish;
pub mod render;
pub mod types;
pub mod window;

pub use classify::find_new_contributors;
pub use config::{DigestConfig, RepoRef};
pub use error::DigestError;
pub use fetch::fetch_merged_changes;
pub use github::{GitHubApi, GitHubClient};
pub use pipeline::{collect_digest_data, run_digest, run_digest_at};
pub use publish::{Gate, decide, publish_discussion};
pub use render::{calculate_activity_count, generate_title, render_digest};
pub use types::{Contributor, DigestData, DigestResult, MergedChange, SkipReason};
pub use window::ReportWindow;
