//! Trait for fetching the diff of one file, with its existing comments.

use crate::model::DiffModel;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching a diff.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The path is not part of the reviewed change.
    #[error("No changes found for {0}")]
    NotFound(String),

    #[error("Failed to fetch diff: {0}")]
    Failed(String),
}

/// Provides the diff of a file in the reviewed change.
///
/// The returned model carries every existing comment with its identity.
/// Implementations may return an empty model instead of `NotFound` when the
/// path has no hunks; callers treat both the same way.
#[async_trait]
pub trait DiffSource: Send + Sync {
    async fn fetch_diff(&self, path: &str) -> Result<DiffModel, FetchError>;
}
