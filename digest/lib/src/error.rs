//! Error types for the digest library.

use thiserror::Error;

/// Errors that abort a digest run.
///
/// Per-author classification failures never surface as a `DigestError`; the
/// classifier absorbs them and treats the author as a returning contributor.
#[derive(Error, Debug)]
pub enum DigestError {
    /// No authentication token was supplied
    #[error("GitHub token is required")]
    MissingToken,

    /// Repository identity was not in `owner/name` form
    #[error("Invalid repository '{0}': expected owner/name")]
    InvalidRepository(String),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// GitHub API rate limit exceeded
    #[error("GitHub API rate limit exceeded")]
    RateLimitExceeded,

    /// GitHub answered with a non-success HTTP status
    #[error("GitHub API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// The GraphQL response carried an `errors` array
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The GraphQL response was missing an expected field
    #[error("GraphQL response missing {0}")]
    MissingData(&'static str),

    /// The configured discussion category does not exist in the repository
    #[error(
        "Discussion category \"{requested}\" not found. Available categories: {}",
        available.join(", ")
    )]
    CategoryNotFound {
        /// The category name from the configuration.
        requested: String,
        /// Every category name the repository reported.
        available: Vec<String>,
    },
}
