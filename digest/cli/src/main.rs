//! Digest CLI - post a community activity digest to GitHub Discussions

mod outputs;

use std::path::PathBuf;

use clap::Parser;
use digest_lib::config::{
    DEFAULT_MAX_NEW_CONTRIBUTORS, DEFAULT_MAX_PRS, DEFAULT_MIN_ACTIVITY, DEFAULT_SINCE_DAYS,
};
use digest_lib::github::client::DEFAULT_GRAPHQL_ENDPOINT;
use digest_lib::{DigestConfig, DigestResult, GitHubClient, RepoRef, SkipReason, run_digest};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "digest")]
#[command(about = "Post a community activity digest to GitHub Discussions", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long)]
    json: bool,

    /// Repository to report on
    #[arg(long, env = "GITHUB_REPOSITORY", value_name = "OWNER/NAME")]
    repo: RepoRef,

    /// GitHub token with discussion write access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Discussion category to post in (case-insensitive)
    #[arg(long, env = "DIGEST_DISCUSSION_CATEGORY")]
    category: String,

    /// Days to look back
    #[arg(long, env = "DIGEST_SINCE_DAYS", default_value_t = DEFAULT_SINCE_DAYS, allow_negative_numbers = true)]
    since_days: i64,

    /// Maximum merged pull requests to list
    #[arg(long, env = "DIGEST_MAX_PRS", default_value_t = DEFAULT_MAX_PRS)]
    max_prs: usize,

    /// Maximum new contributors to list
    #[arg(long, env = "DIGEST_MAX_NEW_CONTRIBUTORS", default_value_t = DEFAULT_MAX_NEW_CONTRIBUTORS)]
    max_new_contributors: usize,

    /// Minimum activity (merged pull requests + new contributors) required to post
    #[arg(long, env = "DIGEST_MIN_ACTIVITY", default_value_t = DEFAULT_MIN_ACTIVITY)]
    min_activity: usize,

    /// Render the digest to stdout instead of posting it
    #[arg(long, env = "DIGEST_DRY_RUN")]
    dry_run: bool,

    /// Leave out the "star the repository" footer
    #[arg(long, env = "DIGEST_NO_FOOTER_STAR_LINK")]
    no_footer_star_link: bool,

    /// Pages of 100 merged pull requests to scan
    #[arg(long = "pages", env = "DIGEST_FETCH_PAGES", default_value_t = 1)]
    fetch_pages: usize,

    /// Contributor lookups allowed in flight at once
    #[arg(long = "concurrency", env = "DIGEST_CLASSIFY_CONCURRENCY", default_value_t = 1)]
    classify_concurrency: usize,

    /// GraphQL endpoint (GitHub Enterprise)
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = DEFAULT_GRAPHQL_ENDPOINT)]
    api_url: String,

    /// Print the full result as JSON
    #[arg(long)]
    output_json: bool,
}

impl Cli {
    fn digest_config(&self) -> DigestConfig {
        DigestConfig::new(self.repo.clone(), self.category.clone())
            .with_since_days(self.since_days)
            .with_max_prs(self.max_prs)
            .with_max_new_contributors(self.max_new_contributors)
            .with_min_activity(self.min_activity)
            .with_dry_run(self.dry_run)
            .with_footer_star_link(!self.no_footer_star_link)
            .with_fetch_pages(self.fetch_pages)
            .with_classify_concurrency(self.classify_concurrency)
    }
}

/// Log filter for a `-v` count when `RUST_LOG` is unset.
///
/// Logs go to stderr so stdout stays clean for the digest itself.
fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        // run summary: window, counts, gate decision, discussion URL
        1 => "warn,digest_lib=info,digest_cli=info",
        // per page and per author lookups
        2 => "warn,digest_lib=debug,digest_cli=debug",
        // GraphQL request spans plus HTTP client chatter
        _ => "info,digest_lib=trace,digest_cli=trace,reqwest=debug",
    }
}

/// Installs the tracing subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8, json: bool) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity_filter(verbose)));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        // one object per event, span fields included, for workflow log scrapers
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(verbose >= 2)
                    .without_time()
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

/// Prints the outcome for a human reader.
fn report(result: &DigestResult, config: &DigestConfig) {
    match (result.skip_reason, &result.discussion_url) {
        (Some(SkipReason::BelowThreshold), _) => {
            println!(
                "Activity count ({}) is below threshold ({}). Skipping digest.",
                result.activity_count, config.min_activity
            );
        }
        (Some(SkipReason::DryRun), _) => {
            if let Some(title) = &result.title {
                println!("{}\n", title);
            }
            if let Some(markdown) = &result.markdown {
                println!("{}", markdown);
            }
        }
        (None, Some(url)) => println!("Digest posted: {}", url),
        (None, None) => println!("Activity count: {}", result.activity_count),
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.digest_config();
    let client = GitHubClient::new(cli.token.clone().unwrap_or_default())?
        .with_endpoint(cli.api_url.clone());

    tracing::info!(repo = %config.repo, since_days = config.since_days, "Building digest");

    let result = run_digest(&client, &config).await?;

    if let Ok(path) = std::env::var("GITHUB_OUTPUT")
        && !path.is_empty()
    {
        outputs::append_outputs(&PathBuf::from(path), &result)?;
    }

    if cli.output_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        report(&result, &config);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.json);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
