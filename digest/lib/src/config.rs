//! Run configuration for a digest.
//!
//! A [`DigestConfig`] is built once by the caller and passed by reference to
//! every pipeline stage. Where the values come from (flags, environment,
//! workflow inputs) is the caller's concern.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DigestError;

/// Default lookback window in days.
pub const DEFAULT_SINCE_DAYS: i64 = 7;
/// Default cap on merged pull requests listed in a digest.
pub const DEFAULT_MAX_PRS: usize = 10;
/// Default cap on new contributors listed in a digest.
pub const DEFAULT_MAX_NEW_CONTRIBUTORS: usize = 10;
/// Default minimum activity count required to publish.
pub const DEFAULT_MIN_ACTIVITY: usize = 3;
/// Largest lookback, in either direction, accepted by [`DigestConfig::validate`].
pub const MAX_SINCE_DAYS: i64 = 36_500;

/// Target repository identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Public web URL of the repository.
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

/// Parses the `owner/name` form used by `GITHUB_REPOSITORY`.
///
/// ## Examples
///
/// ```
/// use digest_lib::RepoRef;
///
/// let repo: RepoRef = "rust-lang/rust".parse().unwrap();
/// assert_eq!(repo.owner, "rust-lang");
/// assert_eq!(repo.name, "rust");
///
/// assert!("rust-lang".parse::<RepoRef>().is_err());
/// ```
impl FromStr for RepoRef {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        match parts.as_slice() {
            [owner, name] => {
                let name = name.trim_end_matches(".git");
                if owner.is_empty() || name.is_empty() {
                    return Err(DigestError::InvalidRepository(s.to_string()));
                }
                Ok(Self::new(*owner, name))
            }
            _ => Err(DigestError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Immutable parameters for a single digest run.
///
/// ## Examples
///
/// ```
/// use digest_lib::{DigestConfig, RepoRef};
///
/// let config = DigestConfig::new(RepoRef::new("octo", "demo"), "Announcements")
///     .with_since_days(14)
///     .with_dry_run(true);
///
/// assert_eq!(config.since_days, 14);
/// assert_eq!(config.max_prs, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Repository to report on and publish to
    pub repo: RepoRef,
    /// Name of the discussion category to post in (matched case-insensitively)
    pub discussion_category: String,
    /// Lookback window in days
    pub since_days: i64,
    /// Maximum merged pull requests listed
    pub max_prs: usize,
    /// Maximum new contributors listed
    pub max_new_contributors: usize,
    /// Activity count required before anything is published
    pub min_activity: usize,
    /// Render without publishing
    pub dry_run: bool,
    /// Append the "star the repository" footer
    pub footer_star_link: bool,
    /// Pages of 100 merged pull requests to scan; 1 keeps the single-page fetch
    pub fetch_pages: usize,
    /// Author classification queries allowed in flight at once
    pub classify_concurrency: usize,
}

impl DigestConfig {
    /// Creates a configuration with the default limits.
    pub fn new(repo: RepoRef, discussion_category: impl Into<String>) -> Self {
        Self {
            repo,
            discussion_category: discussion_category.into(),
            since_days: DEFAULT_SINCE_DAYS,
            max_prs: DEFAULT_MAX_PRS,
            max_new_contributors: DEFAULT_MAX_NEW_CONTRIBUTORS,
            min_activity: DEFAULT_MIN_ACTIVITY,
            dry_run: false,
            footer_star_link: true,
            fetch_pages: 1,
            classify_concurrency: 1,
        }
    }

    pub fn with_since_days(mut self, days: i64) -> Self {
        self.since_days = days;
        self
    }

    pub fn with_max_prs(mut self, max: usize) -> Self {
        self.max_prs = max;
        self
    }

    pub fn with_max_new_contributors(mut self, max: usize) -> Self {
        self.max_new_contributors = max;
        self
    }

    pub fn with_min_activity(mut self, min: usize) -> Self {
        self.min_activity = min;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_footer_star_link(mut self, enabled: bool) -> Self {
        self.footer_star_link = enabled;
        self
    }

    pub fn with_fetch_pages(mut self, pages: usize) -> Self {
        self.fetch_pages = pages;
        self
    }

    pub fn with_classify_concurrency(mut self, limit: usize) -> Self {
        self.classify_concurrency = limit;
        self
    }

    /// Checks values the pipeline cannot work with.
    ///
    /// A non-positive `since_days` is allowed and simply yields an empty window.
    ///
    /// ## Errors
    ///
    /// Returns `DigestError::InvalidConfig` for an empty category name, a
    /// `since_days` beyond [`MAX_SINCE_DAYS`], or a zero page count or
    /// concurrency limit.
    pub fn validate(&self) -> Result<(), DigestError> {
        if self.discussion_category.trim().is_empty() {
            return Err(DigestError::InvalidConfig(
                "discussion category must not be empty".to_string(),
            ));
        }
        if self.since_days.unsigned_abs() > MAX_SINCE_DAYS.unsigned_abs() {
            return Err(DigestError::InvalidConfig(format!(
                "since_days must be between -{MAX_SINCE_DAYS} and {MAX_SINCE_DAYS}, got {}",
                self.since_days
            )));
        }
        if self.fetch_pages == 0 {
            return Err(DigestError::InvalidConfig(
                "fetch_pages must be at least 1".to_string(),
            ));
        }
        if self.classify_concurrency == 0 {
            return Err(DigestError::InvalidConfig(
                "classify_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_repo_ref() {
        let repo: RepoRef = "tokio-rs/tokio".parse().unwrap();
        assert_eq!(repo, RepoRef::new("tokio-rs", "tokio"));
        assert_eq!(repo.to_string(), "tokio-rs/tokio");
        assert_eq!(repo.html_url(), "https://github.com/tokio-rs/tokio");
    }

    #[test]
    fn parse_repo_ref_strips_git_suffix() {
        let repo: RepoRef = " serde-rs/serde.git ".parse().unwrap();
        assert_eq!(repo.name, "serde");
    }

    #[test]
    fn parse_repo_ref_rejects_bad_shapes() {
        for bad in ["", "owner", "/repo", "owner/", "owner/.git", "a/b/c"] {
            assert!(
                matches!(
                    bad.parse::<RepoRef>(),
                    Err(DigestError::InvalidRepository(_))
                ),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn defaults() {
        let config = DigestConfig::new(RepoRef::new("o", "r"), "General");
        assert_eq!(config.since_days, 7);
        assert_eq!(config.max_prs, 10);
        assert_eq!(config.max_new_contributors, 10);
        assert_eq!(config.min_activity, 3);
        assert!(!config.dry_run);
        assert!(config.footer_star_link);
        assert_eq!(config.fetch_pages, 1);
        assert_eq!(config.classify_concurrency, 1);
    }

    #[test]
    fn validate_rejects_empty_category() {
        let config = DigestConfig::new(RepoRef::new("o", "r"), "  ");
        assert!(matches!(
            config.validate(),
            Err(DigestError::InvalidConfig(_))
        ));
    }

    #[test]
    fn validate_rejects_zero_pages_and_concurrency() {
        let base = DigestConfig::new(RepoRef::new("o", "r"), "General");
        assert!(base.clone().with_fetch_pages(0).validate().is_err());
        assert!(base.clone().with_classify_concurrency(0).validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_lookback() {
        let base = DigestConfig::new(RepoRef::new("o", "r"), "General");
        for days in [200_000_000, -200_000_000, i64::MAX, i64::MIN, MAX_SINCE_DAYS + 1] {
            let err = base.clone().with_since_days(days).validate().unwrap_err();
            assert!(
                matches!(&err, DigestError::InvalidConfig(msg) if msg.contains("since_days")),
                "unexpected error for {}: {}",
                days,
                err
            );
        }
        assert!(base.clone().with_since_days(MAX_SINCE_DAYS).validate().is_ok());
        assert!(base.with_since_days(-MAX_SINCE_DAYS).validate().is_ok());
    }

    #[test]
    fn validate_accepts_degenerate_window() {
        let config = DigestConfig::new(RepoRef::new("o", "r"), "General").with_since_days(0);
        assert!(config.validate().is_ok());
    }
}
