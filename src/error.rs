//! Error types for each stage of a run.
//!
//! Listing, configuration and directory preparation errors are fatal and
//! abort the run before any clone starts. [`CloneError`] is per repository and
//! is turned into a failed outcome by the clone executor.

use std::path::PathBuf;

use thiserror::Error;

/// Startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "GITHUB_TOKEN environment variable is not set. Create a personal access token and export it as GITHUB_TOKEN."
    )]
    MissingToken,
}

/// Failures while listing an organization's repositories.
#[derive(Debug, Error)]
pub enum ListError {
    /// HTTP 401, 403 or 429: bad credentials or an exhausted rate limit.
    #[error(
        "GitHub API refused the request (HTTP {status}): {message}. Check that GITHUB_TOKEN is valid and that its rate limit is not exhausted."
    )]
    Authentication { status: u16, message: String },

    /// Any other non-success status.
    #[error("GitHub API returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The organization has no repository in the requested language.
    #[error("No repositories in '{org}' use language '{language}'")]
    NotFound { org: String, language: String },

    /// A page could not be decoded into repository descriptors.
    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    /// The request never produced a response.
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ListError {
    /// Server errors and transport failures may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ListError::Transport { .. } => true,
            ListError::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Destination directory preparation failures.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Refusing to delete {}: confirmation declined", .path.display())]
    Declined { path: PathBuf },

    #[error("{} exists and is not a directory", .path.display())]
    NotADirectory { path: PathBuf },
}

/// A single repository clone failure.
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git clone failed ({exit}): {stderr}")]
    GitFailed { exit: String, stderr: String },

    #[error("clone task aborted: {0}")]
    Aborted(String),

    #[error("refusing to clone into unsafe directory name {0:?}")]
    UnsafeName(String),
}
