//! Publish gate and discussion publisher.

use tracing::info;

use crate::config::DigestConfig;
use crate::error::DigestError;
use crate::github::GitHubApi;
use crate::types::SkipReason;

/// What the run should do with a digest of a given activity count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Skip(SkipReason),
    Publish,
}

/// Applies the threshold first, then the dry-run switch.
///
/// ## Examples
///
/// ```
/// use digest_lib::{DigestConfig, Gate, RepoRef, SkipReason, decide};
///
/// let config = DigestConfig::new(RepoRef::new("o", "r"), "General").with_min_activity(3);
/// assert_eq!(decide(2, &config), Gate::Skip(SkipReason::BelowThreshold));
/// assert_eq!(decide(3, &config), Gate::Publish);
/// assert_eq!(decide(3, &config.with_dry_run(true)), Gate::Skip(SkipReason::DryRun));
/// ```
pub fn decide(activity_count: usize, config: &DigestConfig) -> Gate {
    if activity_count < config.min_activity {
        Gate::Skip(SkipReason::BelowThreshold)
    } else if config.dry_run {
        Gate::Skip(SkipReason::DryRun)
    } else {
        Gate::Publish
    }
}

/// Posts the digest as a discussion in the configured category.
///
/// Makes exactly two sequential calls: one to resolve the repository and
/// category IDs, one to create the discussion. The category name is matched
/// case-insensitively against the repository's categories.
///
/// ## Errors
///
/// - `DigestError::CategoryNotFound` listing every available category
/// - any remote error from either call
pub async fn publish_discussion<A: GitHubApi>(
    api: &A,
    config: &DigestConfig,
    title: &str,
    body: &str,
) -> Result<String, DigestError> {
    let resolved = api.discussion_categories(&config.repo).await?;

    let wanted = config.discussion_category.to_lowercase();
    let Some(category) = resolved
        .categories
        .iter()
        .find(|c| c.name.to_lowercase() == wanted)
    else {
        return Err(DigestError::CategoryNotFound {
            requested: config.discussion_category.clone(),
            available: resolved.categories.iter().map(|c| c.name.clone()).collect(),
        });
    };

    info!(category = %category.name, "Creating discussion");

    api.create_discussion(&resolved.repository_id, &category.id, title, body)
        .await
}
