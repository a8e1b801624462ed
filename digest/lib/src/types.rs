//! Core value types flowing through the digest pipeline.
//!
//! Every stage consumes one of these by reference and produces a new value;
//! nothing here is mutated after construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login substituted when a pull request's author account no longer exists.
pub const GHOST_LOGIN: &str = "ghost";

/// Profile URL paired with [`GHOST_LOGIN`].
pub const GHOST_URL: &str = "https://github.com/ghost";

/// A pull request merged inside the report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedChange {
    /// Pull request number
    pub number: u64,
    /// Pull request title
    pub title: String,
    /// Link to the pull request
    pub url: String,
    /// Author login, or [`GHOST_LOGIN`]
    pub author: String,
    /// Author profile link, or [`GHOST_URL`]
    pub author_url: String,
    /// When the pull request was merged
    pub merged_at: DateTime<Utc>,
}

impl MergedChange {
    /// Whether the author is the placeholder for a deleted account.
    pub fn is_ghost(&self) -> bool {
        self.author == GHOST_LOGIN
    }
}

/// A first-time contributor and the pull request that earned the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub url: String,
    pub pr_number: u64,
    pub pr_title: String,
    pub pr_url: String,
}

impl Contributor {
    /// Builds the record from the author's first merged change in the window.
    pub fn from_change(change: &MergedChange) -> Self {
        Self {
            login: change.author.clone(),
            url: change.author_url.clone(),
            pr_number: change.number,
            pr_title: change.title.clone(),
            pr_url: change.url.clone(),
        }
    }
}

/// Everything the renderer needs for one digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestData {
    pub merged_changes: Vec<MergedChange>,
    pub new_contributors: Vec<Contributor>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

/// Why a run finished without publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Activity count was under the configured minimum
    BelowThreshold,
    /// Digest was rendered but publishing was disabled
    DryRun,
}

impl SkipReason {
    /// Stable reason code reported to the invoking automation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::BelowThreshold => "below_threshold",
            SkipReason::DryRun => "dry_run",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a digest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestResult {
    /// Whether a discussion was created
    pub posted: bool,
    /// Merged changes plus new contributors
    pub activity_count: usize,
    /// URL of the created discussion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_url: Option<String>,
    /// Digest title, present whenever the digest was rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Rendered markdown body, present whenever the digest was rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
}

impl DigestResult {
    pub(crate) fn skipped(activity_count: usize, reason: SkipReason) -> Self {
        Self {
            posted: false,
            activity_count,
            discussion_url: None,
            title: None,
            markdown: None,
            skip_reason: Some(reason),
        }
    }
}
