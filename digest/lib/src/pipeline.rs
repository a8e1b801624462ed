//! End-to-end digest run.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::classify::find_new_contributors;
use crate::config::DigestConfig;
use crate::error::DigestError;
use crate::fetch::fetch_merged_changes;
use crate::github::GitHubApi;
use crate::publish::{Gate, decide, publish_discussion};
use crate::render::{calculate_activity_count, generate_title, render_digest};
use crate::types::{DigestData, DigestResult, SkipReason};
use crate::window::ReportWindow;

/// Collects merged pull requests and first-time contributors for the window.
///
/// Classification sees every merged pull request in the window; both lists
/// are truncated to their configured caps only afterwards.
///
/// ## Errors
///
/// Propagates fetch failures. Classification failures are absorbed.
pub async fn collect_digest_data<A: GitHubApi>(
    api: &A,
    config: &DigestConfig,
    window: ReportWindow,
) -> Result<DigestData, DigestError> {
    let mut merged_changes = fetch_merged_changes(api, config, &window).await?;
    let mut new_contributors = find_new_contributors(api, config, &merged_changes).await;

    merged_changes.truncate(config.max_prs);
    new_contributors.truncate(config.max_new_contributors);

    Ok(DigestData {
        merged_changes,
        new_contributors,
        period_start: window.start,
        period_end: window.end,
    })
}

/// Runs the digest anchored at the current time.
///
/// ## Examples
///
/// ```rust,no_run
/// use digest_lib::{DigestConfig, GitHubClient, RepoRef, run_digest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GitHubClient::new(std::env::var("GITHUB_TOKEN")?)?;
/// let config = DigestConfig::new(RepoRef::new("octo", "demo"), "Announcements")
///     .with_dry_run(true);
///
/// let result = run_digest(&client, &config).await?;
/// if let Some(markdown) = result.markdown {
///     println!("{markdown}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn run_digest<A: GitHubApi>(
    api: &A,
    config: &DigestConfig,
) -> Result<DigestResult, DigestError> {
    run_digest_at(api, config, Utc::now()).await
}

/// Runs the digest with an explicit "now".
///
/// ## Errors
///
/// Returns an error for invalid configuration, a failed fetch, an unknown
/// discussion category, or a failed discussion creation. Skips are not
/// errors; they come back as a result with `skip_reason` set.
#[instrument(skip(api, config), fields(repo = %config.repo))]
pub async fn run_digest_at<A: GitHubApi>(
    api: &A,
    config: &DigestConfig,
    now: DateTime<Utc>,
) -> Result<DigestResult, DigestError> {
    config.validate()?;

    let window = ReportWindow::ending_at(now, config.since_days);
    info!(since_days = config.since_days, start = %window.start, "Collecting digest data");

    let data = collect_digest_data(api, config, window).await?;
    let activity_count = calculate_activity_count(&data);

    info!(
        merged = data.merged_changes.len(),
        new_contributors = data.new_contributors.len(),
        activity_count,
        "Digest data collected"
    );

    let gate = decide(activity_count, config);
    if gate == Gate::Skip(SkipReason::BelowThreshold) {
        info!(
            activity_count,
            min_activity = config.min_activity,
            "Activity below threshold, skipping digest"
        );
        return Ok(DigestResult::skipped(activity_count, SkipReason::BelowThreshold));
    }

    let title = generate_title(data.period_end);
    let markdown = render_digest(&data, config);

    match gate {
        Gate::Skip(reason) => {
            info!(skip_reason = %reason, "Not publishing digest");
            Ok(DigestResult {
                posted: false,
                activity_count,
                discussion_url: None,
                title: Some(title),
                markdown: Some(markdown),
                skip_reason: Some(reason),
            })
        }
        Gate::Publish => {
            let url = publish_discussion(api, config, &title, &markdown).await?;
            info!(url = %url, "Digest posted");
            Ok(DigestResult {
                posted: true,
                activity_count,
                discussion_url: Some(url),
                title: Some(title),
                markdown: Some(markdown),
                skip_reason: None,
            })
        }
    }
}
