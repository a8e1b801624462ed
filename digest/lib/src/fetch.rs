//! Merged pull request fetching and window filtering.
//!
//! The remote returns merged pull requests ordered by last update, not by
//! merge time, so the window is applied client-side. With the default
//! `fetch_pages = 1` only the 100 most recently updated pull requests are
//! scanned; a busy repository can therefore lose older qualifying merges.
//! Raising `fetch_pages` follows the cursor, stopping as soon as a page ends
//! with a pull request last updated before the window opened.

use tracing::debug;

use crate::config::DigestConfig;
use crate::error::DigestError;
use crate::github::{GitHubApi, PullRequestNode};
use crate::types::{GHOST_LOGIN, GHOST_URL, MergedChange};
use crate::window::ReportWindow;

/// Fetches merged pull requests whose merge time falls inside `window`.
///
/// The result keeps fetch order and is not capped; callers truncate to
/// `max_prs` once classification has seen the full set.
///
/// ## Errors
///
/// Any remote failure aborts the fetch; no partial list is returned.
pub async fn fetch_merged_changes<A: GitHubApi>(
    api: &A,
    config: &DigestConfig,
    window: &ReportWindow,
) -> Result<Vec<MergedChange>, DigestError> {
    let mut changes = Vec::new();
    let mut cursor: Option<String> = None;

    for page_number in 1..=config.fetch_pages {
        let page = api
            .merged_pull_requests(&config.repo, cursor.as_deref())
            .await?;

        let scanned = page.nodes.len();
        let page_is_stale = page
            .nodes
            .last()
            .and_then(|node| node.updated_at)
            .is_some_and(|updated| updated < window.start);

        changes.extend(
            page.nodes
                .into_iter()
                .filter_map(|node| to_merged_change(node, window)),
        );

        debug!(page = page_number, scanned, kept = changes.len(), "Scanned merged pull requests");

        if !page.has_next_page || page_is_stale {
            break;
        }
        match page.end_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(changes)
}

/// Maps a remote record into the window, or drops it.
fn to_merged_change(node: PullRequestNode, window: &ReportWindow) -> Option<MergedChange> {
    let merged_at = node.merged_at?;
    if !window.contains(merged_at) {
        return None;
    }

    let (author, author_url) = match node.author {
        Some(actor) => (actor.login, actor.url),
        None => (GHOST_LOGIN.to_string(), GHOST_URL.to_string()),
    };

    Some(MergedChange {
        number: node.number,
        title: node.title,
        url: node.url,
        author,
        author_url,
        merged_at,
    })
}
