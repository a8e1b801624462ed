//! First-time contributor classification.
//!
//! An author counts as a first-time contributor when GitHub reports exactly
//! one merged pull request by them in the repository. The count is taken when
//! the digest runs, not when the pull request merged, so an author whose
//! second pull request lands before the digest runs is no longer "new".

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::config::{DigestConfig, RepoRef};
use crate::github::GitHubApi;
use crate::types::{Contributor, MergedChange};

/// Finds first-time contributors among the authors of `changes`.
///
/// Each distinct, non-ghost author is checked once, in the order they first
/// appear; the record points at that first pull request. Up to
/// `classify_concurrency` checks run at once, and results keep first-seen
/// order regardless of completion order. The list is not capped.
pub async fn find_new_contributors<A: GitHubApi>(
    api: &A,
    config: &DigestConfig,
    changes: &[MergedChange],
) -> Vec<Contributor> {
    let mut seen = HashSet::new();
    let candidates: Vec<&MergedChange> = changes
        .iter()
        .filter(|change| !change.is_ghost())
        .filter(|change| seen.insert(change.author.as_str()))
        .collect();

    debug!(
        authors = candidates.len(),
        concurrency = config.classify_concurrency,
        "Classifying authors"
    );

    let results: Vec<Option<Contributor>> = stream::iter(candidates)
        .map(move |change| async move {
            is_first_time_contributor(api, &config.repo, &change.author)
                .await
                .then(|| Contributor::from_change(change))
        })
        .buffered(config.classify_concurrency.max(1))
        .collect()
        .await;

    results.into_iter().flatten().collect()
}

/// Whether `author` has exactly one merged pull request in `repo`.
///
/// A failed lookup answers `false` so one bad query cannot sink the digest.
async fn is_first_time_contributor<A: GitHubApi>(api: &A, repo: &RepoRef, author: &str) -> bool {
    match api.merged_pull_request_count(repo, author).await {
        Ok(count) => {
            debug!(author, count, "Merged pull request count");
            count == 1
        }
        Err(err) => {
            warn!(author, error = %err, "Could not classify contributor, treating as returning");
            false
        }
    }
}
