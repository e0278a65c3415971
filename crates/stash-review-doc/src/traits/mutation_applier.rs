//! Trait for replaying comment mutations on the review service.

use crate::model::{Identity, Mutation};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while applying a single mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The comment changed remotely since it was fetched.
    #[error("Version conflict on comment {0}")]
    VersionConflict(Identity),

    /// The service refused the request.
    #[error("Rejected by the review service: {0}")]
    Rejected(String),

    /// The request did not complete.
    #[error("Request failed: {0}")]
    Failed(String),
}

impl ApplyError {
    /// Whether the remaining mutations can still be attempted after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ApplyError::VersionConflict(_))
    }
}

/// Applies mutations (create, update, delete) to the reviewed file's comments.
///
/// Implementations know which pull request and file they act on; the
/// mutation only carries what changes.
///
/// # Example
///
/// ```ignore
/// struct Recorder(std::sync::Mutex<Vec<Mutation>>);
///
/// #[async_trait]
/// impl MutationApplier for Recorder {
///     async fn apply(&self, mutation: &Mutation) -> Result<Option<Identity>, ApplyError> {
///         self.0.lock().unwrap().push(mutation.clone());
///         Ok(None)
///     }
/// }
/// ```
#[async_trait]
pub trait MutationApplier: Send + Sync {
    /// Apply one mutation.
    ///
    /// # Returns
    /// The identity assigned by the service for `Create`, `None` otherwise.
    ///
    /// # Errors
    /// `ApplyError::VersionConflict` when the version token carried by an
    /// `Update` or `Delete` no longer matches the service.
    async fn apply(&self, mutation: &Mutation) -> Result<Option<Identity>, ApplyError>;
}

/// An applier that only logs what it would do.
pub struct DryRunApplier;

#[async_trait]
impl MutationApplier for DryRunApplier {
    async fn apply(&self, mutation: &Mutation) -> Result<Option<Identity>, ApplyError> {
        log::info!("dry run: would {}", mutation);
        Ok(None)
    }
}
