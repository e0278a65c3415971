//! Stash client trait and error definitions
//!
//! This module defines the `StashClient` trait that all client
//! implementations must satisfy.

use crate::reference::{PullRequestRef, RepoRef};
use crate::types::{ChangedFile, PullRequest, PullRequestState};
use async_trait::async_trait;
use stash_review_doc::{DiffModel, Identity, LineAnchor};
use thiserror::Error;

/// Errors returned by Stash API calls.
#[derive(Debug, Error)]
pub enum StashError {
    /// HTTP 409: the version token no longer matches.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// HTTP 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP 401 or 403.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other unsuccessful status.
    #[error("Stash responded with HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] octocrab::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The comment cannot be anchored (a line without a number on its side).
    #[error("Cannot anchor a comment on {0}")]
    InvalidAnchor(LineAnchor),

    /// Identities not issued by Stash, whose parts are not numbers.
    #[error("'{0}' is not a Stash comment identity")]
    InvalidIdentity(Identity),
}

impl StashError {
    /// Map an unsuccessful HTTP status to an error.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            409 => StashError::Conflict(message),
            404 => StashError::NotFound(message),
            401 | 403 => StashError::Unauthorized(message),
            _ => StashError::Status { status, message },
        }
    }
}

/// Stash API client trait
///
/// Defines the pull request operations the commands need. The comment
/// operations act on comments anchored to lines of a single file.
///
/// # Example
///
/// ```rust,ignore
/// use stash_client::{PullRequestRef, StashClient};
///
/// async fn count_files(client: &dyn StashClient, pr: &PullRequestRef) -> Result<usize, StashError> {
///     Ok(client.fetch_changes(pr).await?.len())
/// }
/// ```
#[async_trait]
pub trait StashClient: Send + Sync {
    /// Fetch the diff of `path` with its line comments.
    ///
    /// # Returns
    ///
    /// An empty model when the file is not part of the pull request.
    async fn fetch_diff(&self, pr: &PullRequestRef, path: &str) -> Result<DiffModel, StashError>;

    /// Fetch the files changed by a pull request.
    async fn fetch_changes(&self, pr: &PullRequestRef) -> Result<Vec<ChangedFile>, StashError>;

    /// Fetch the pull requests of a repository in the given state.
    async fn fetch_pull_requests(
        &self,
        repo: &RepoRef,
        state: PullRequestState,
    ) -> Result<Vec<PullRequest>, StashError>;

    /// Post a new comment on a line of `path`.
    ///
    /// # Returns
    ///
    /// The identity assigned to the comment.
    async fn create_comment(
        &self,
        pr: &PullRequestRef,
        path: &str,
        anchor: &LineAnchor,
        text: &str,
    ) -> Result<Identity, StashError>;

    /// Replace the text of a comment.
    ///
    /// # Errors
    ///
    /// `StashError::Conflict` when `identity.version` is outdated.
    async fn update_comment(
        &self,
        pr: &PullRequestRef,
        identity: &Identity,
        text: &str,
    ) -> Result<Identity, StashError>;

    /// Delete a comment.
    ///
    /// # Errors
    ///
    /// `StashError::Conflict` when `identity.version` is outdated.
    async fn delete_comment(&self, pr: &PullRequestRef, identity: &Identity) -> Result<(), StashError>;
}
